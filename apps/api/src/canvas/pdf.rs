//! PDF canvas built on `lopdf`.
//!
//! Pages reference the three standard Helvetica Type1 faces with WinAnsi
//! encoding, so no font program is embedded. Content and image streams are
//! Flate-compressed. The document carries no Info dictionary or file ID, which
//! keeps the output byte-identical for identical input.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use crate::canvas::Canvas;
use crate::errors::CanvasError;
use crate::layout::{FontFace, PageGeometry, StandardFontMeasurer, TextMeasure};
use crate::report::draw::{Color, TextStyle};
use crate::report::images::ResolvedImage;

/// PDF points per millimetre.
const PT_PER_MM: f32 = 72.0 / 25.4;

const FACES: [FontFace; 3] = [FontFace::Regular, FontFace::Bold, FontFace::Oblique];

fn font_resource(face: FontFace) -> &'static str {
    match face {
        FontFace::Regular => "F1",
        FontFace::Bold => "F2",
        FontFace::Oblique => "F3",
    }
}

/// Operations and image resources of the page being drawn.
struct PageBuffer {
    content: Content,
    images: Vec<(String, ObjectId)>,
}

pub struct PdfCanvas {
    document: Document,
    pages_id: ObjectId,
    fonts: Dictionary,
    page_ids: Vec<ObjectId>,
    current: Option<PageBuffer>,
    width_pt: f32,
    height_pt: f32,
    image_count: usize,
    measurer: StandardFontMeasurer,
}

impl PdfCanvas {
    pub fn new(geometry: &PageGeometry) -> Self {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        let mut fonts = Dictionary::new();
        for face in FACES {
            let font_id = document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => face.base_font(),
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(font_resource(face), font_id);
        }

        Self {
            document,
            pages_id,
            fonts,
            page_ids: Vec::new(),
            current: None,
            width_pt: geometry.width * PT_PER_MM,
            height_pt: geometry.height * PT_PER_MM,
            image_count: 0,
            measurer: StandardFontMeasurer,
        }
    }

    fn page(&mut self) -> Result<&mut PageBuffer, CanvasError> {
        self.current.as_mut().ok_or(CanvasError::NoOpenPage)
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) -> Result<(), CanvasError> {
        self.page()?
            .content
            .operations
            .push(Operation::new(operator, operands));
        Ok(())
    }

    /// Top-down millimetre `y` to bottom-up PDF points.
    fn flip(&self, y_mm: f32) -> f32 {
        self.height_pt - y_mm * PT_PER_MM
    }

    fn set_fill(&mut self, color: Color) -> Result<(), CanvasError> {
        self.push(
            "rg",
            vec![
                (color.r as f32 / 255.0).into(),
                (color.g as f32 / 255.0).into(),
                (color.b as f32 / 255.0).into(),
            ],
        )
    }

    /// Writes the open page, if any, into the document.
    fn close_page(&mut self) -> Result<(), CanvasError> {
        let Some(page) = self.current.take() else {
            return Ok(());
        };

        let mut stream = Stream::new(Dictionary::new(), page.content.encode()?);
        stream.compress()?;
        let content_id = self.document.add_object(stream);

        let mut resources = dictionary! { "Font" => self.fonts.clone() };
        if !page.images.is_empty() {
            let mut xobjects = Dictionary::new();
            for (name, id) in &page.images {
                xobjects.set(name.as_str(), *id);
            }
            resources.set("XObject", xobjects);
        }

        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                self.width_pt.into(),
                self.height_pt.into(),
            ],
            "Contents" => content_id,
            "Resources" => resources,
        });
        self.page_ids.push(page_id);
        Ok(())
    }
}

impl TextMeasure for PdfCanvas {
    fn text_width(&self, text: &str, face: FontFace, font_size_pt: f32) -> f32 {
        self.measurer.text_width(text, face, font_size_pt)
    }
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self) -> Result<(), CanvasError> {
        self.close_page()?;
        self.current = Some(PageBuffer {
            content: Content { operations: Vec::new() },
            images: Vec::new(),
        });
        Ok(())
    }

    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), CanvasError> {
        let x_pt = x * PT_PER_MM;
        let y_pt = self.flip(y);
        self.push("BT", vec![])?;
        self.push("Tf", vec![font_resource(style.face).into(), style.size.into()])?;
        self.set_fill(style.color)?;
        self.push("Td", vec![x_pt.into(), y_pt.into()])?;
        self.push("Tj", vec![Object::string_literal(encode_win_ansi(text))])?;
        self.push("ET", vec![])
    }

    fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    ) -> Result<(), CanvasError> {
        let bottom = self.flip(y + height);
        self.push("q", vec![])?;
        self.set_fill(fill)?;
        self.push(
            "re",
            vec![
                (x * PT_PER_MM).into(),
                bottom.into(),
                (width * PT_PER_MM).into(),
                (height * PT_PER_MM).into(),
            ],
        )?;
        self.push("f", vec![])?;
        self.push("Q", vec![])
    }

    fn draw_image(
        &mut self,
        image: &ResolvedImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), CanvasError> {
        // Fail before allocating the XObject if no page is open.
        self.page()?;

        let mut stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width),
                "Height" => i64::from(image.height),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8_i64,
            },
            image.pixels.to_vec(),
        );
        stream.compress()?;
        let image_id = self.document.add_object(stream);

        let name = format!("Im{}", self.image_count);
        self.image_count += 1;
        self.page()?.images.push((name.clone(), image_id));

        let bottom = self.flip(y + height);
        self.push("q", vec![])?;
        self.push(
            "cm",
            vec![
                (width * PT_PER_MM).into(),
                Object::Integer(0),
                Object::Integer(0),
                (height * PT_PER_MM).into(),
                (x * PT_PER_MM).into(),
                bottom.into(),
            ],
        )?;
        self.push("Do", vec![Object::Name(name.into_bytes())])?;
        self.push("Q", vec![])
    }

    fn finalize(mut self) -> Result<Vec<u8>, CanvasError> {
        self.close_page()?;

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let count = kids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let catalog_id = self.document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.document.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        self.document.save_to(&mut bytes)?;
        Ok(bytes)
    }
}

/// Encodes text for a WinAnsi (CP1252) font. Characters outside the code page
/// become `?`.
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            ' '..='~' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::images::tests::solid_image;

    fn style() -> TextStyle {
        TextStyle::new(FontFace::Regular, 11.0, Color::gray(68))
    }

    fn page_operators(bytes: &[u8], page_number: u32) -> Vec<Operation> {
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        let page_id = pages[&page_number];
        doc.get_and_decode_page_content(page_id).unwrap().operations
    }

    #[test]
    fn test_encode_win_ansi() {
        assert_eq!(encode_win_ansi("Abc 1"), b"Abc 1".to_vec());
        assert_eq!(encode_win_ansi("€"), vec![0x80]);
        assert_eq!(encode_win_ansi("à•"), vec![0xE0, 0x95]);
        assert_eq!(encode_win_ansi("ÀÈ"), vec![0xC0, 0xC8]);
        assert_eq!(encode_win_ansi("漢"), b"?".to_vec());
    }

    #[test]
    fn test_draw_before_page_fails() {
        let mut canvas = PdfCanvas::new(&PageGeometry::default());
        let err = canvas.draw_text("x", 10.0, 10.0, &style()).unwrap_err();
        assert!(matches!(err, CanvasError::NoOpenPage));
    }

    #[test]
    fn test_pages_are_counted_and_parsed_back() {
        let mut canvas = PdfCanvas::new(&PageGeometry::default());
        for _ in 0..3 {
            canvas.new_page().unwrap();
            canvas.draw_text("Pagina", 20.0, 30.0, &style()).unwrap();
        }
        let bytes = canvas.finalize().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_text_is_flipped_to_pdf_coordinates() {
        let mut canvas = PdfCanvas::new(&PageGeometry::default());
        canvas.new_page().unwrap();
        canvas.draw_text("Prezzo €120.00", 20.0, 30.0, &style()).unwrap();
        let bytes = canvas.finalize().unwrap();

        let ops = page_operators(&bytes, 1);
        let td = ops.iter().find(|op| op.operator == "Td").unwrap();
        let x = td.operands[0].as_float().unwrap();
        let y = td.operands[1].as_float().unwrap();
        assert!((x - 20.0 * PT_PER_MM).abs() < 0.01);
        assert!((y - (297.0 - 30.0) * PT_PER_MM).abs() < 0.01);

        let tj = ops.iter().find(|op| op.operator == "Tj").unwrap();
        let encoded = encode_win_ansi("Prezzo €120.00");
        assert_eq!(tj.operands[0].as_str().unwrap(), encoded.as_slice());
    }

    #[test]
    fn test_image_becomes_xobject() {
        let mut canvas = PdfCanvas::new(&PageGeometry::default());
        canvas.new_page().unwrap();
        canvas.draw_image(&solid_image(4, 3), 30.0, 40.0, 35.0, 26.0).unwrap();
        let bytes = canvas.finalize().unwrap();

        let ops = page_operators(&bytes, 1);
        assert!(ops.iter().any(|op| op.operator == "Do"));

        let doc = Document::load_mem(&bytes).unwrap();
        let page_id = doc.get_pages()[&1];
        let page = doc.get_dictionary(page_id).unwrap();
        let resources = page.get(b"Resources").unwrap().as_dict().unwrap();
        let xobjects = resources.get(b"XObject").unwrap().as_dict().unwrap();
        assert!(xobjects.has(b"Im0"));
    }

    #[test]
    fn test_identical_drawing_gives_identical_bytes() {
        let render = || {
            let mut canvas = PdfCanvas::new(&PageGeometry::default());
            canvas.new_page().unwrap();
            let fill = Color::rgb(248, 249, 250);
            canvas.draw_rect(20.0, 20.0, 170.0, 35.0, fill).unwrap();
            canvas.draw_text("METRICHE PRINCIPALI", 20.0, 25.0, &style()).unwrap();
            canvas.draw_image(&solid_image(8, 8), 30.0, 60.0, 20.0, 20.0).unwrap();
            canvas.finalize().unwrap()
        };
        assert_eq!(render(), render());
    }
}
