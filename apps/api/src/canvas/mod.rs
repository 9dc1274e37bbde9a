// Document canvas: the drawing surface the assembler replays draw ops onto.
// Coordinates are millimetres from the top-left page corner, as in `report::draw`.

pub mod pdf;

pub use pdf::PdfCanvas;

use crate::errors::CanvasError;
use crate::layout::TextMeasure;
use crate::report::draw::{Color, TextStyle};
use crate::report::images::ResolvedImage;

/// Drawing capability of an output document.
///
/// Draw calls target the page opened by the most recent `new_page`.
pub trait Canvas: TextMeasure {
    fn new_page(&mut self) -> Result<(), CanvasError>;

    /// Left-aligned text with its baseline at `y`.
    fn draw_text(
        &mut self,
        text: &str,
        x: f32,
        y: f32,
        style: &TextStyle,
    ) -> Result<(), CanvasError>;

    fn draw_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        fill: Color,
    ) -> Result<(), CanvasError>;

    fn draw_image(
        &mut self,
        image: &ResolvedImage,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<(), CanvasError>;

    /// Closes the last page and serializes the document.
    fn finalize(self) -> Result<Vec<u8>, CanvasError>
    where
        Self: Sized;
}
