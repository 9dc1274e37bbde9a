//! Section Composers: one pure function per report section.
//!
//! Every composer takes the shared [`ComposeContext`], its slice of the input and
//! a [`PageCursor`], and returns a [`PlacementResult`]. Composers never draw
//! directly; the assembler replays their ops onto a canvas.
//!
//! # Rules
//! - Reserve space with `PageFlow::ensure_space` before emitting any op.
//! - Every op carries the page index of the cursor it was placed with.
//! - The returned cursor is always within the page bounds.

pub mod chart;
pub mod competitor;
pub mod footer;
pub mod header;
pub mod kpi;
pub mod property_facts;

use crate::layout::{
    FontFace, LayoutBox, LineWrapper, PageCursor, PageFlow, TextBudget, TextMeasure, MM_PER_PT,
};
use crate::report::draw::{
    Color, DrawOp, TextAlign, TextOp, TextStyle, HEADING_COLOR, TEXT_ASCENT,
};
use crate::report::settings::ReportConfig;

/// Shared read-only state for one composition pass.
pub struct ComposeContext<'a> {
    pub measurer: &'a dyn TextMeasure,
    pub config: &'a ReportConfig,
    pub flow: PageFlow,
}

impl<'a> ComposeContext<'a> {
    pub fn new(measurer: &'a dyn TextMeasure, config: &'a ReportConfig) -> Self {
        Self {
            measurer,
            config,
            flow: PageFlow::new(config.geometry),
        }
    }

    pub fn wrapper(&self, face: FontFace) -> LineWrapper<'a> {
        LineWrapper::new(self.measurer, face, self.config.line_spacing)
    }

    pub fn wrap(
        &self,
        face: FontFace,
        text: &str,
        max_width: f32,
        font_size: f32,
        budget: TextBudget,
    ) -> LayoutBox {
        self.wrapper(face).wrap(text, max_width, font_size, budget)
    }

    pub fn left(&self) -> f32 {
        self.config.geometry.margin_left
    }

    pub fn content_width(&self) -> f32 {
        self.config.geometry.content_width()
    }

    /// Clamps a cursor that ran past the bottom limit back onto it.
    pub fn clamp(&self, cursor: PageCursor) -> PageCursor {
        self.flow.gap(cursor, 0.0)
    }

    /// Section heading at the cursor. Returns the op and the cursor below it.
    pub fn heading(&self, text: &str, cursor: PageCursor, advance: f32) -> (DrawOp, PageCursor) {
        let style = TextStyle::new(FontFace::Bold, self.config.heading_size, HEADING_COLOR);
        let y = baseline(cursor.y_offset, style.size);
        let op = text_op(cursor.page_index, self.left(), y, text, style);
        (op, self.flow.advance(cursor, advance))
    }
}

/// Baseline for a single line whose top edge sits at `top`, so glyphs stay
/// inside the reserved area.
pub fn baseline(top: f32, font_size: f32) -> f32 {
    top + font_size * MM_PER_PT * TEXT_ASCENT
}

pub fn text_op(page: usize, x: f32, y: f32, text: &str, style: TextStyle) -> DrawOp {
    DrawOp::Text(TextOp {
        page,
        x,
        y,
        text: text.to_string(),
        style,
        align: TextAlign::Left,
    })
}

/// One text op per line of `layout`, top edge at `top`.
pub fn layout_ops(
    layout: &LayoutBox,
    page: usize,
    x: f32,
    top: f32,
    face: FontFace,
    color: Color,
) -> Vec<DrawOp> {
    let style = TextStyle::new(face, layout.font_size, color);
    layout
        .lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            let y = baseline(top + i as f32 * layout.line_height, layout.font_size);
            text_op(page, x, y, line, style)
        })
        .collect()
}
