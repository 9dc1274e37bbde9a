// Header: the brand logo, or a centred text title when no logo is available.

use crate::layout::{FontFace, PageCursor};
use crate::report::composers::{baseline, ComposeContext};
use crate::report::draw::{
    DrawOp, ImageOp, PlacementResult, TextAlign, TextOp, TextStyle, HEADING_COLOR,
};
use crate::report::images::ResolvedImage;

pub fn compose_header(
    ctx: &ComposeContext<'_>,
    logo: Option<&ResolvedImage>,
    cursor: PageCursor,
) -> PlacementResult {
    let config = ctx.config;
    let page_width = config.geometry.width;

    match logo {
        Some(image) => {
            let (width, height) = image.fit_within(ctx.content_width(), config.logo_height);
            let cursor = ctx.flow.ensure_space(cursor, height);
            let op = DrawOp::Image(ImageOp {
                page: cursor.page_index,
                x: (page_width - width) / 2.0,
                y: cursor.y_offset,
                width,
                height,
                image: image.clone(),
            });
            let cursor = ctx.flow.gap(ctx.flow.advance(cursor, height), config.logo_gap);
            PlacementResult {
                cursor,
                draw_ops: vec![op],
            }
        }
        None => {
            let cursor = ctx.flow.ensure_space(cursor, config.header_title_advance);
            let style = TextStyle::new(FontFace::Bold, config.header_title_size, HEADING_COLOR);
            let op = DrawOp::Text(TextOp {
                page: cursor.page_index,
                x: page_width / 2.0,
                y: baseline(cursor.y_offset, style.size),
                text: config.header_title(),
                style,
                align: TextAlign::Center,
            });
            PlacementResult {
                cursor: ctx.flow.advance(cursor, config.header_title_advance),
                draw_ops: vec![op],
            }
        }
    }
}
