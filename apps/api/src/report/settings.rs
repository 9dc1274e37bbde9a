//! Report layout configuration: every tunable size, budget and limit in one place.
//!
//! Units: lengths in millimetres, font sizes in points.

use std::time::Duration;

use anyhow::{bail, Result};

use crate::layout::{PageGeometry, TextBudget};

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub geometry: PageGeometry,

    /// Brand name: header fallback title and file-name prefix.
    pub title: String,
    /// Printed in the footer of every page.
    pub platform_name: String,

    pub image_timeout: Duration,
    pub max_competitors: usize,

    // ── text budgets ────────────────────────────────────────────────────────
    pub title_budget: TextBudget,
    pub detail_budget: TextBudget,
    pub badge_budget: TextBudget,
    pub fact_value_budget: TextBudget,

    // ── font sizes (pt) ─────────────────────────────────────────────────────
    pub header_title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub highlight_size: f32,
    /// Inclusive range searched for competitor titles, largest first.
    pub card_title_sizes: (u8, u8),
    pub detail_size: f32,
    pub badge_size: f32,
    pub footer_size: f32,
    /// Line advance as a multiple of the font size.
    pub line_spacing: f32,

    // ── block geometry (mm) ─────────────────────────────────────────────────
    pub logo_height: f32,
    pub logo_gap: f32,
    pub header_title_advance: f32,
    pub heading_advance: f32,
    /// Advance after the competitor and chart headings.
    pub list_heading_advance: f32,
    pub fact_row_height: f32,
    pub fact_value_x: f32,
    pub label_indent: f32,
    pub block_gap: f32,
    pub kpi_reserve: f32,
    pub kpi_box_height: f32,
    pub kpi_advance: f32,
    pub kpi_second_column_x: f32,
    pub competitor_reserve: f32,
    pub card_padding: f32,
    /// Left inset of card text and image from the content edge.
    pub card_text_indent: f32,
    pub card_image_width: f32,
    pub card_image_height: f32,
    pub card_image_gap: f32,
    pub card_gap: f32,
    pub chart_max_height: f32,
    pub chart_gap: f32,
    pub footer_offset: f32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            geometry: PageGeometry::default(),
            title: "Immoby".to_string(),
            platform_name: "Immoby Analytics Platform".to_string(),
            image_timeout: Duration::from_millis(2000),
            max_competitors: 10,
            title_budget: TextBudget::new(2, 40),
            detail_budget: TextBudget::new(2, 50),
            badge_budget: TextBudget::new(1, 60),
            fact_value_budget: TextBudget::new(1, 60),
            header_title_size: 20.0,
            heading_size: 16.0,
            body_size: 11.0,
            highlight_size: 14.0,
            card_title_sizes: (10, 7),
            detail_size: 8.0,
            badge_size: 7.0,
            footer_size: 9.0,
            line_spacing: 1.25,
            logo_height: 25.0,
            logo_gap: 15.0,
            header_title_advance: 20.0,
            heading_advance: 12.0,
            list_heading_advance: 15.0,
            fact_row_height: 7.0,
            fact_value_x: 80.0,
            label_indent: 5.0,
            block_gap: 10.0,
            kpi_reserve: 60.0,
            kpi_box_height: 35.0,
            kpi_advance: 45.0,
            kpi_second_column_x: 110.0,
            competitor_reserve: 40.0,
            card_padding: 4.0,
            card_text_indent: 10.0,
            card_image_width: 35.0,
            card_image_height: 26.0,
            card_image_gap: 3.0,
            card_gap: 10.0,
            chart_max_height: 100.0,
            chart_gap: 15.0,
            footer_offset: 10.0,
        }
    }
}

impl ReportConfig {
    /// Rejects configurations the layout engine cannot honour.
    pub fn validate(&self) -> Result<()> {
        let g = &self.geometry;
        if g.width <= 0.0 || g.height <= 0.0 {
            bail!("page dimensions must be positive");
        }
        if g.margin_left + g.margin_right >= g.width {
            bail!("horizontal margins leave no content width");
        }
        if g.margin_top + g.margin_bottom >= g.height {
            bail!("vertical margins leave no usable height");
        }
        if self.footer_offset <= 0.0 || self.footer_offset >= g.margin_bottom {
            bail!("footer must sit inside the bottom margin");
        }
        for (name, budget) in [
            ("title", self.title_budget),
            ("detail", self.detail_budget),
            ("badge", self.badge_budget),
            ("fact value", self.fact_value_budget),
        ] {
            if budget.max_lines == 0 || budget.max_chars_per_line == 0 {
                bail!("{name} budget must allow at least one line and one character");
            }
        }
        if self.image_timeout.is_zero() {
            bail!("image timeout must be positive");
        }
        let (largest, smallest) = self.card_title_sizes;
        if smallest == 0 || largest < smallest {
            bail!("card title sizes must be a non-empty descending range");
        }
        if self.chart_max_height <= 0.0 {
            bail!("chart max height must be positive");
        }
        if self.line_spacing <= 0.0 {
            bail!("line spacing must be positive");
        }
        Ok(())
    }

    /// Fallback header text when no logo is configured.
    pub fn header_title(&self) -> String {
        format!("{} - {}", self.title, crate::report::labels::HEADER_SUBTITLE)
    }
}
