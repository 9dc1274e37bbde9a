//! Chart Section: monthly revenue distribution.
//!
//! A rendered chart bitmap is preferred. Without one, twelve monthly fractions
//! are drawn as native bars. With neither, the section is skipped.
//!
//! The bitmap keeps its aspect ratio: it spans the content width unless the
//! height cap binds first, in which case it is narrower and centred. It is
//! never stretched.

use tracing::debug;

use crate::layout::{FontFace, PageCursor};
use crate::report::composers::{baseline, ComposeContext};
use crate::report::draw::{
    Color, DrawOp, ImageOp, PlacementResult, RectOp, TextAlign, TextOp, TextStyle, MUTED_COLOR,
};
use crate::report::format;
use crate::report::images::ResolvedImage;
use crate::report::labels;
use crate::report::model::ChartSource;

const BAR_FILL: Color = Color::rgb(54, 162, 235);
const AXIS_COLOR: Color = Color::gray(180);
/// Share of each month's slot covered by its bar.
const BAR_WIDTH_RATIO: f32 = 0.6;
const AXIS_THICKNESS: f32 = 0.3;
const BAR_LABEL_SIZE: f32 = 6.0;
const MONTH_LABEL_SIZE: f32 = 7.0;
/// Space above the tallest bar for its value label.
const VALUE_LABEL_SPACE: f32 = 5.0;
/// Space below the axis for month labels.
const MONTH_LABEL_SPACE: f32 = 6.0;

pub fn compose_chart(
    ctx: &ComposeContext<'_>,
    chart: &ChartSource,
    cursor: PageCursor,
) -> PlacementResult {
    if let Some(bitmap) = &chart.bitmap {
        return place_bitmap(ctx, bitmap, cursor);
    }
    if let Some(values) = chart.monthly_values() {
        return place_bars(ctx, &values, cursor);
    }
    debug!("no chart data, skipping chart section");
    PlacementResult::unchanged(cursor)
}

fn place_bitmap(
    ctx: &ComposeContext<'_>,
    bitmap: &ResolvedImage,
    cursor: PageCursor,
) -> PlacementResult {
    let config = ctx.config;
    let heading_advance = config.list_heading_advance;
    let max_height = config
        .chart_max_height
        .min(config.geometry.usable_height() - heading_advance);
    let (width, height) = bitmap.fit_within(ctx.content_width(), max_height);

    let cursor = ctx.flow.ensure_space(cursor, heading_advance + height);
    let (heading, cursor) = ctx.heading(labels::CHART_HEADING, cursor, heading_advance);

    let image = DrawOp::Image(ImageOp {
        page: cursor.page_index,
        x: ctx.left() + (ctx.content_width() - width) / 2.0,
        y: cursor.y_offset,
        width,
        height,
        image: bitmap.clone(),
    });

    let cursor = ctx.flow.advance(cursor, height);
    PlacementResult {
        cursor: ctx.flow.gap(cursor, config.chart_gap),
        draw_ops: vec![heading, image],
    }
}

fn place_bars(
    ctx: &ComposeContext<'_>,
    values: &[f64; 12],
    cursor: PageCursor,
) -> PlacementResult {
    let config = ctx.config;
    let heading_advance = config.list_heading_advance;
    let chrome = VALUE_LABEL_SPACE + MONTH_LABEL_SPACE;
    let plot_height = (config.chart_max_height * 0.6)
        .min(config.geometry.usable_height() - heading_advance - chrome);
    let block = heading_advance + chrome + plot_height;

    let cursor = ctx.flow.ensure_space(cursor, block);
    let page = cursor.page_index;
    let (heading, cursor) = ctx.heading(labels::CHART_HEADING, cursor, heading_advance);
    let mut draw_ops = vec![heading];

    let axis_y = cursor.y_offset + VALUE_LABEL_SPACE + plot_height;
    let slot = ctx.content_width() / values.len() as f32;
    let bar_width = slot * BAR_WIDTH_RATIO;
    let max = values.iter().cloned().fold(0.0_f64, f64::max);

    let value_style = TextStyle::new(FontFace::Regular, BAR_LABEL_SIZE, MUTED_COLOR);
    let month_style = TextStyle::new(FontFace::Regular, MONTH_LABEL_SIZE, MUTED_COLOR);

    for (i, (&value, month)) in values.iter().zip(labels::MONTHS).enumerate() {
        let centre = ctx.left() + slot * (i as f32 + 0.5);
        if max > 0.0 && value > 0.0 {
            let height = (value / max) as f32 * plot_height;
            draw_ops.push(DrawOp::Rect(RectOp {
                page,
                x: centre - bar_width / 2.0,
                y: axis_y - height,
                width: bar_width,
                height,
                fill: BAR_FILL,
            }));
            draw_ops.push(centred(
                page,
                centre,
                axis_y - height - 1.0,
                &format::percent(Some(value), 0),
                value_style,
            ));
        }
        draw_ops.push(centred(
            page,
            centre,
            baseline(axis_y + 1.0, MONTH_LABEL_SIZE),
            month,
            month_style,
        ));
    }

    draw_ops.push(DrawOp::Rect(RectOp {
        page,
        x: ctx.left(),
        y: axis_y,
        width: ctx.content_width(),
        height: AXIS_THICKNESS,
        fill: AXIS_COLOR,
    }));

    let cursor = ctx.flow.advance(cursor, chrome + plot_height);
    PlacementResult {
        cursor: ctx.flow.gap(cursor, config.chart_gap),
        draw_ops,
    }
}

fn centred(page: usize, x: f32, y: f32, text: &str, style: TextStyle) -> DrawOp {
    DrawOp::Text(TextOp {
        page,
        x,
        y,
        text: text.to_string(),
        style,
        align: TextAlign::Center,
    })
}
