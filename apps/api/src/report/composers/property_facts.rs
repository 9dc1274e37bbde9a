// Property facts: a heading and six label/value rows, reserved as one block.

use crate::layout::{FontFace, PageCursor};
use crate::report::composers::{baseline, layout_ops, text_op, ComposeContext};
use crate::report::draw::{PlacementResult, TextStyle, BODY_COLOR};
use crate::report::labels;
use crate::report::model::PropertyFacts;

pub fn compose_property_facts(
    ctx: &ComposeContext<'_>,
    facts: &PropertyFacts,
    cursor: PageCursor,
) -> PlacementResult {
    let config = ctx.config;
    let rows = [
        (labels::ADDRESS, facts.address.clone()),
        (labels::BEDROOMS, facts.bedrooms.to_string()),
        (labels::BATHS, facts.baths.to_string()),
        (labels::GUESTS, facts.guests.to_string()),
        (labels::STRUCTURE_TYPE, labels::structure_type(facts.structure_type).to_string()),
        (labels::CONDITION, labels::condition(facts.condition).to_string()),
    ];

    let block_height = config.heading_advance + rows.len() as f32 * config.fact_row_height;
    let cursor = ctx.flow.ensure_space(cursor, block_height);
    let page = cursor.page_index;

    let (heading, mut cursor) =
        ctx.heading(labels::PROPERTY_HEADING, cursor, config.heading_advance);
    let mut draw_ops = vec![heading];

    let label_x = ctx.left() + config.label_indent;
    let value_x = config.fact_value_x;
    let value_width = config.geometry.width - config.geometry.margin_right - value_x;
    let label_style = TextStyle::new(FontFace::Bold, config.body_size, BODY_COLOR);

    for (label, value) in rows {
        let y = baseline(cursor.y_offset, config.body_size);
        draw_ops.push(text_op(page, label_x, y, label, label_style));

        let wrapped = ctx.wrap(
            FontFace::Regular,
            &value,
            value_width,
            config.body_size,
            config.fact_value_budget,
        );
        let top = cursor.y_offset;
        draw_ops.extend(layout_ops(&wrapped, page, value_x, top, FontFace::Regular, BODY_COLOR));

        cursor = ctx.flow.advance(cursor, config.fact_row_height);
    }

    PlacementResult {
        cursor: ctx.flow.gap(cursor, config.block_gap),
        draw_ops,
    }
}
