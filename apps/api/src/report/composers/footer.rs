// Footer: generation timestamp and platform name, centred near the page bottom.
// Drawn once per page by the assembler; it never consumes flow height.

use chrono::NaiveDateTime;

use crate::layout::FontFace;
use crate::report::composers::ComposeContext;
use crate::report::draw::{DrawOp, TextAlign, TextOp, TextStyle, FOOTER_COLOR};
use crate::report::labels;

pub fn footer_text(generated_at: NaiveDateTime, platform: &str) -> String {
    labels::footer(
        &generated_at.format("%d/%m/%Y").to_string(),
        &generated_at.format("%H:%M:%S").to_string(),
        platform,
    )
}

pub fn compose_footer(ctx: &ComposeContext<'_>, page: usize, generated_at: NaiveDateTime) -> DrawOp {
    let config = ctx.config;
    let geometry = config.geometry;
    DrawOp::Text(TextOp {
        page,
        x: geometry.width / 2.0,
        y: geometry.height - config.footer_offset,
        text: footer_text(generated_at, &config.platform_name),
        style: TextStyle::new(FontFace::Oblique, config.footer_size, FOOTER_COLOR),
        align: TextAlign::Center,
    })
}
