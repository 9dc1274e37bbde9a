//! KPI boxes: occupancy, average daily rate and the highlighted annual gross yield.

use crate::layout::{FontFace, PageCursor};
use crate::report::composers::{text_op, ComposeContext};
use crate::report::draw::{
    DrawOp, PlacementResult, RectOp, TextStyle, BODY_COLOR, HIGHLIGHT_COLOR, PANEL_FILL,
};
use crate::report::format;
use crate::report::labels;
use crate::report::model::{Currency, PropertyFacts, ValuationMetrics};

/// Nights per year used by the yield estimate.
const YIELD_NIGHTS: f64 = 360.0;

// Baseline offsets inside the box, from its top edge.
const FIRST_LABEL_Y: f32 = 8.0;
const FIRST_VALUE_Y: f32 = 16.0;
const SECOND_LABEL_Y: f32 = 26.0;
const SECOND_VALUE_Y: f32 = 34.0;
const HIGHLIGHT_VALUE_Y: f32 = 20.0;

/// `360 × occupancy × ADR × condition factor × structure type factor`.
///
/// `None` when either metric is missing.
pub fn annual_gross_yield(metrics: &ValuationMetrics, facts: &PropertyFacts) -> Option<f64> {
    let occupancy = metrics.occupancy?;
    let adr = metrics.average_daily_rate?;
    Some(
        YIELD_NIGHTS
            * occupancy
            * adr
            * facts.condition.yield_factor()
            * facts.structure_type.yield_factor(),
    )
}

pub fn compose_kpis(
    ctx: &ComposeContext<'_>,
    metrics: &ValuationMetrics,
    facts: &PropertyFacts,
    currency: Currency,
    cursor: PageCursor,
) -> PlacementResult {
    let config = ctx.config;
    let cursor = ctx.flow.ensure_space(cursor, config.kpi_reserve);
    let page = cursor.page_index;

    let (heading, cursor) = ctx.heading(labels::KPI_HEADING, cursor, config.heading_advance);
    let top = cursor.y_offset;
    let left = ctx.left() + config.label_indent;
    let right = config.kpi_second_column_x;

    let label = TextStyle::new(FontFace::Bold, config.body_size, BODY_COLOR);
    let value = TextStyle::new(FontFace::Regular, config.body_size, BODY_COLOR);
    let highlight_label = TextStyle::new(FontFace::Bold, config.body_size, HIGHLIGHT_COLOR);
    let highlight_value = TextStyle::new(FontFace::Bold, config.highlight_size, HIGHLIGHT_COLOR);

    let yield_value = annual_gross_yield(metrics, facts);

    let draw_ops = vec![
        heading,
        DrawOp::Rect(RectOp {
            page,
            x: ctx.left(),
            y: top,
            width: ctx.content_width(),
            height: config.kpi_box_height,
            fill: PANEL_FILL,
        }),
        text_op(page, left, top + FIRST_LABEL_Y, labels::OCCUPANCY, label),
        text_op(page, left, top + FIRST_VALUE_Y, &format::percent(metrics.occupancy, 2), value),
        text_op(page, left, top + SECOND_LABEL_Y, labels::AVERAGE_DAILY_RATE, label),
        text_op(
            page,
            left,
            top + SECOND_VALUE_Y,
            &format::currency(metrics.average_daily_rate, currency),
            value,
        ),
        text_op(page, right, top + FIRST_LABEL_Y, labels::ANNUAL_GROSS_YIELD, highlight_label),
        text_op(
            page,
            right,
            top + HIGHLIGHT_VALUE_Y,
            &format::currency(yield_value, currency),
            highlight_value,
        ),
    ];

    PlacementResult {
        cursor: ctx.clamp(ctx.flow.advance(cursor, config.kpi_advance)),
        draw_ops,
    }
}
