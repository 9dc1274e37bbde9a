//! Document Assembler: runs the composers in report order and renders the result.
//!
//! # Rules
//! - Composers run strictly in order: header, property facts, KPIs, competitor
//!   cards, chart. The cursor returned by one is the input of the next.
//! - Competitor images are resolved one at a time, in list order, each before its
//!   card is placed.
//! - Replay happens page by page; every page gets its footer.
//! - Replay and serialization are CPU-bound and run inside `spawn_blocking`.

use chrono::NaiveDateTime;
use tracing::{debug, info};

use crate::canvas::Canvas;
use crate::errors::{CanvasError, ReportError};
use crate::layout::{PageCursor, TextMeasure};
use crate::report::composers::chart::compose_chart;
use crate::report::composers::competitor::{compose_competitor_heading, place_card, CardLayout};
use crate::report::composers::footer::compose_footer;
use crate::report::composers::header::compose_header;
use crate::report::composers::kpi::compose_kpis;
use crate::report::composers::property_facts::compose_property_facts;
use crate::report::composers::ComposeContext;
use crate::report::draw::{DrawOp, PlacementResult, TextAlign};
use crate::report::images::{ImagePlacer, ResolvedImage};
use crate::report::model::ReportInput;
use crate::report::settings::ReportConfig;

/// Draw ops for a whole report, before replay.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedReport {
    pub ops: Vec<DrawOp>,
    pub page_count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedReport {
    pub bytes: Vec<u8>,
    pub file_name: String,
    pub page_count: usize,
}

pub struct DocumentAssembler {
    config: ReportConfig,
    placer: ImagePlacer,
    logo: Option<ResolvedImage>,
}

impl DocumentAssembler {
    pub fn new(config: ReportConfig, placer: ImagePlacer, logo: Option<ResolvedImage>) -> Self {
        Self {
            config,
            placer,
            logo,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// `"<title> <DD-MM-YYYY>.pdf"`.
    pub fn file_name(&self, generated_at: NaiveDateTime) -> String {
        format!("{} {}.pdf", self.config.title, generated_at.format("%d-%m-%Y"))
    }

    /// Lays out the whole report. Never fails: missing data degrades the output.
    pub async fn compose(&self, input: &ReportInput, measurer: &dyn TextMeasure) -> ComposedReport {
        let config = &self.config;
        let ctx = ComposeContext::new(measurer, config);
        let mut ops = Vec::new();

        let mut cursor = ctx.flow.start();
        cursor = absorb(&ctx, &mut ops, compose_header(&ctx, self.logo.as_ref(), cursor));
        cursor = absorb(&ctx, &mut ops, compose_property_facts(&ctx, &input.property, cursor));
        cursor = absorb(
            &ctx,
            &mut ops,
            compose_kpis(&ctx, &input.metrics, &input.property, input.currency, cursor),
        );

        let total = input.competitors.len();
        let shown = total.min(config.max_competitors);
        if shown < total {
            info!(total, shown, "competitor list truncated");
        }
        if shown > 0 {
            cursor = absorb(&ctx, &mut ops, compose_competitor_heading(&ctx, cursor));
            for (index, record) in input.competitors.iter().take(shown).enumerate() {
                let layout = CardLayout::build(&ctx, record, input.currency);
                let image = match record.image_url.as_deref().map(str::trim) {
                    Some(url) if !url.is_empty() => {
                        self.placer.resolve(url, config.image_timeout).await
                    }
                    _ => None,
                };
                debug!(
                    card = index,
                    listing = record.identity(index),
                    has_image = image.is_some(),
                    "placing competitor card"
                );
                let placed = place_card(&ctx, &layout, image.as_ref(), index, cursor, false);
                cursor = absorb(&ctx, &mut ops, placed);
            }
        }

        cursor = absorb(&ctx, &mut ops, compose_chart(&ctx, &input.chart, cursor));

        let page_count = ops.iter().map(DrawOp::page).max().unwrap_or(0).max(cursor.page_index) + 1;
        ComposedReport { ops, page_count }
    }

    /// Composes the report, replays it onto `canvas` with a footer on every page
    /// and serializes the document.
    pub async fn generate<C>(
        &self,
        input: &ReportInput,
        canvas: C,
        generated_at: NaiveDateTime,
    ) -> Result<GeneratedReport, ReportError>
    where
        C: Canvas + 'static,
    {
        let composed = self.compose(input, &canvas).await;
        let page_count = composed.page_count;

        let ctx = ComposeContext::new(&canvas, &self.config);
        let footers: Vec<DrawOp> = (0..page_count)
            .map(|page| compose_footer(&ctx, page, generated_at))
            .collect();

        let bytes = tokio::task::spawn_blocking(move || {
            render(canvas, composed.ops, footers, page_count)
        })
        .await
        .map_err(|e| ReportError::Task(e.to_string()))??;

        info!(pages = page_count, bytes = bytes.len(), "report generated");

        Ok(GeneratedReport {
            bytes,
            file_name: self.file_name(generated_at),
            page_count,
        })
    }
}

/// Appends a composer's ops and hands back its cursor.
fn absorb(ctx: &ComposeContext<'_>, ops: &mut Vec<DrawOp>, placed: PlacementResult) -> PageCursor {
    debug_assert!(ctx.flow.in_bounds(placed.cursor), "cursor out of bounds: {:?}", placed.cursor);
    ops.extend(placed.draw_ops);
    placed.cursor
}

/// Replays ops page by page. `footers[p]` is drawn last on page `p`.
fn render<C: Canvas>(
    mut canvas: C,
    mut ops: Vec<DrawOp>,
    footers: Vec<DrawOp>,
    page_count: usize,
) -> Result<Vec<u8>, CanvasError> {
    // Stable: keeps each page's ops in composition order.
    ops.sort_by_key(DrawOp::page);

    let mut pending = ops.iter().peekable();
    for (page, footer) in footers.iter().enumerate().take(page_count) {
        canvas.new_page()?;
        while let Some(op) = pending.next_if(|op| op.page() == page) {
            draw(&mut canvas, op)?;
        }
        draw(&mut canvas, footer)?;
    }

    canvas.finalize()
}

fn draw<C: Canvas>(canvas: &mut C, op: &DrawOp) -> Result<(), CanvasError> {
    match op {
        DrawOp::Text(text) => {
            let x = match text.align {
                TextAlign::Left => text.x,
                TextAlign::Center => {
                    text.x - canvas.text_width(&text.text, text.style.face, text.style.size) / 2.0
                }
            };
            canvas.draw_text(&text.text, x, text.y, &text.style)
        }
        DrawOp::Rect(rect) => canvas.draw_rect(rect.x, rect.y, rect.width, rect.height, rect.fill),
        DrawOp::Image(image) => {
            canvas.draw_image(&image.image, image.x, image.y, image.width, image.height)
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use bytes::Bytes;
    use chrono::NaiveDate;
    use lopdf::{Document, Object};

    use crate::canvas::pdf::encode_win_ansi;
    use crate::canvas::PdfCanvas;
    use crate::errors::ImageError;
    use crate::layout::StandardFontMeasurer;
    use crate::report::composers::footer::footer_text;
    use crate::report::images::tests::{png_bytes, solid_image};
    use crate::report::images::ImageFetcher;
    use crate::report::model::{
        ChartSource, CompetitorRecord, Condition, Currency, PropertyFacts, StructureType,
        ValuationMetrics,
    };

    struct PngFetcher;

    #[async_trait]
    impl ImageFetcher for PngFetcher {
        async fn fetch(&self, _url: &str) -> Result<Bytes, ImageError> {
            Ok(Bytes::from(png_bytes(40, 30)))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ImageFetcher for FailingFetcher {
        async fn fetch(&self, url: &str) -> Result<Bytes, ImageError> {
            Err(ImageError::EmptyBody(url.to_string()))
        }
    }

    fn assembler(fetcher: impl ImageFetcher + 'static) -> DocumentAssembler {
        DocumentAssembler::new(
            ReportConfig::default(),
            ImagePlacer::new(Arc::new(fetcher)),
            None,
        )
    }

    fn competitor(i: usize) -> CompetitorRecord {
        CompetitorRecord {
            listing_id: Some(1000 + i as u64),
            title: format!("annuncio numero {i}"),
            listing_type: "Appartamento intero".to_string(),
            guests: 4,
            bedrooms: 2,
            baths: 1.0,
            average_rate: Some(90.0 + i as f64),
            occupancy: Some(0.65),
            revenue: None,
            review_count: 40,
            rating: Some(4.7),
            amenities: vec!["Wifi".into(), "Cucina".into(), "Parcheggio".into()],
            instant_book: i % 2 == 0,
            min_nights: 2,
            registered: true,
            image_url: Some(format!("https://img.test/{i}.jpg")),
        }
    }

    fn input(competitors: usize) -> ReportInput {
        ReportInput {
            property: PropertyFacts {
                address: "Via Roma 1, 20121 Milano".to_string(),
                bedrooms: 2,
                baths: 1,
                guests: 4,
                structure_type: StructureType::Apartment,
                condition: Condition::Good,
            },
            metrics: ValuationMetrics {
                occupancy: Some(0.75),
                average_daily_rate: Some(120.0),
            },
            currency: Currency::Native,
            competitors: (0..competitors).map(competitor).collect(),
            chart: ChartSource {
                bitmap: Some(solid_image(800, 400)),
                monthly_distribution: None,
            },
        }
    }

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 7)
            .unwrap()
            .and_hms_opt(18, 45, 2)
            .unwrap()
    }

    fn card_titles(ops: &[DrawOp]) -> Vec<(usize, String)> {
        ops.iter()
            .filter_map(|op| match op {
                DrawOp::Text(t) if t.text.starts_with("Annuncio numero") => {
                    Some((t.page, t.text.clone()))
                }
                _ => None,
            })
            .collect()
    }

    // ── compose ─────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_eleven_competitors_truncated_to_ten_in_order() {
        let report = assembler(FailingFetcher).compose(&input(11), &StandardFontMeasurer).await;
        let titles: Vec<String> = card_titles(&report.ops).into_iter().map(|(_, t)| t).collect();
        let expected: Vec<String> = (0..10).map(|i| format!("Annuncio numero {i}")).collect();
        assert_eq!(titles, expected);
    }

    #[tokio::test]
    async fn test_every_op_within_page_bounds() {
        let assembler = assembler(PngFetcher);
        let report = assembler.compose(&input(10), &StandardFontMeasurer).await;
        let g = assembler.config().geometry;
        assert!(report.page_count > 1);
        for op in &report.ops {
            let (top, bottom) = op.vertical_extent();
            assert!(op.page() < report.page_count);
            assert!(
                top >= g.margin_top - 0.01 && bottom <= g.bottom_limit() + 0.01,
                "op out of bounds: {op:?}"
            );
        }
    }

    #[tokio::test]
    async fn test_card_image_follows_its_text_on_same_page() {
        let report = assembler(PngFetcher).compose(&input(10), &StandardFontMeasurer).await;
        let mut last_title_page = None;
        let mut card_images = 0;
        for op in &report.ops {
            match op {
                DrawOp::Text(t) if t.text.starts_with("Annuncio numero") => {
                    last_title_page = Some(t.page);
                }
                DrawOp::Image(img) if img.width <= 35.0 => {
                    assert_eq!(Some(img.page), last_title_page, "image before its text");
                    card_images += 1;
                }
                _ => {}
            }
        }
        assert_eq!(card_images, 10);
    }

    #[tokio::test]
    async fn test_page_index_never_decreases_between_sections() {
        let report = assembler(PngFetcher).compose(&input(10), &StandardFontMeasurer).await;
        let pages: Vec<usize> = report.ops.iter().map(DrawOp::page).collect();
        assert!(pages.windows(2).all(|w| w[1] >= w[0]), "{pages:?}");
    }

    #[tokio::test]
    async fn test_failed_images_degrade_to_text_only_cards() {
        let with_images = assembler(PngFetcher).compose(&input(3), &StandardFontMeasurer).await;
        let without = assembler(FailingFetcher).compose(&input(3), &StandardFontMeasurer).await;
        let count = |r: &ComposedReport| {
            r.ops.iter().filter(|op| matches!(op, DrawOp::Image(_))).count()
        };
        // Chart bitmap only.
        assert_eq!(count(&without), 1);
        assert_eq!(count(&with_images), 4);
        assert_eq!(card_titles(&without.ops).len(), 3);
    }

    #[tokio::test]
    async fn test_no_competitors_skips_section() {
        let report = assembler(PngFetcher).compose(&input(0), &StandardFontMeasurer).await;
        assert!(!report.ops.iter().any(|op| matches!(
            op,
            DrawOp::Text(t) if t.text == "ANALISI COMPETITOR"
        )));
    }

    // ── generate ────────────────────────────────────────────────────────────

    #[tokio::test]
    async fn test_generate_puts_footer_on_every_page() {
        let assembler = assembler(PngFetcher);
        let canvas = PdfCanvas::new(&assembler.config().geometry);
        let report = assembler.generate(&input(10), canvas, generated_at()).await.unwrap();

        let doc = Document::load_mem(&report.bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), report.page_count);
        assert!(report.page_count > 1);

        let footer = encode_win_ansi(&footer_text(generated_at(), "Immoby Analytics Platform"));
        for (number, page_id) in pages {
            let content = doc.get_and_decode_page_content(page_id).unwrap();
            let has_footer = content.operations.iter().any(|op| {
                op.operator == "Tj"
                    && matches!(op.operands.first(), Some(Object::String(s, _)) if *s == footer)
            });
            assert!(has_footer, "page {number} has no footer");
        }
    }

    #[tokio::test]
    async fn test_generate_is_byte_reproducible() {
        let assembler = assembler(PngFetcher);
        let geometry = assembler.config().geometry;
        let first = assembler
            .generate(&input(4), PdfCanvas::new(&geometry), generated_at())
            .await
            .unwrap();
        let second = assembler
            .generate(&input(4), PdfCanvas::new(&geometry), generated_at())
            .await
            .unwrap();
        assert_eq!(first.bytes, second.bytes);
    }

    #[tokio::test]
    async fn test_generate_file_name() {
        let assembler = assembler(FailingFetcher);
        let canvas = PdfCanvas::new(&assembler.config().geometry);
        let report = assembler.generate(&input(1), canvas, generated_at()).await.unwrap();
        assert_eq!(report.file_name, "Immoby 07-03-2026.pdf");
        assert!(report.page_count >= 1);
    }
}
