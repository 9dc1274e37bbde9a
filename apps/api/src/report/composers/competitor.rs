//! Competitor Cards: one card per comparable listing, image below the text.
//!
//! The card's text is wrapped once up front ([`CardLayout::build`]); wrapping does
//! not depend on position, so a card moved to a new page reuses the same layout.
//!
//! # Placement rules
//! - The text block reserves its height with `ensure_space`.
//! - If the image would then cross the bottom limit, the whole card is placed
//!   again at the top of the next page (a single retry).
//! - If the image does not fit even there, it is dropped and a warning logged.
//! - Text and image of a card always share one page.

use tracing::{debug, info, warn};

use crate::layout::font_fit::{self, descending_sizes};
use crate::layout::{FontFace, LayoutBox, PageCursor};
use crate::report::composers::{layout_ops, ComposeContext};
use crate::report::draw::{
    Color, DrawOp, ImageOp, PlacementResult, RectOp, BODY_COLOR, HEADING_COLOR, MUTED_COLOR,
    PANEL_FILL, WHITE,
};
use crate::report::format;
use crate::report::images::ResolvedImage;
use crate::report::labels;
use crate::report::model::{CompetitorRecord, Currency};

/// Amenities listed on a card before the rest are elided.
const MAX_AMENITIES: usize = 4;

// ────────────────────────────────────────────────────────────────────────────
// Card text
// ────────────────────────────────────────────────────────────────────────────

/// The wrapped text blocks of one card, top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct CardLayout {
    pub title: LayoutBox,
    pub details: LayoutBox,
    pub metrics: LayoutBox,
    /// Empty when the listing has no amenities.
    pub amenities: LayoutBox,
    /// Empty when no badge applies.
    pub badges: LayoutBox,
}

impl CardLayout {
    pub fn build(ctx: &ComposeContext<'_>, record: &CompetitorRecord, currency: Currency) -> Self {
        let config = ctx.config;
        let width = card_text_width(ctx);
        let (largest, smallest) = config.card_title_sizes;

        let title = font_fit::fit(
            &ctx.wrapper(FontFace::Bold),
            &format::sentence_case(&record.title),
            width,
            &descending_sizes(largest, smallest),
            config.title_budget,
        );

        let detail = |text: &str| {
            ctx.wrap(FontFace::Regular, text, width, config.detail_size, config.detail_budget)
        };
        let details = detail(&details_text(record));
        let metrics = detail(&metrics_text(record, currency));
        let amenities = detail(&amenities_text(record).unwrap_or_default());
        let badges = ctx.wrap(
            FontFace::Regular,
            &badges_text(record).unwrap_or_default(),
            width,
            config.badge_size,
            config.badge_budget,
        );

        Self {
            title,
            details,
            metrics,
            amenities,
            badges,
        }
    }

    /// Combined height of the text blocks, without padding.
    pub fn text_height(&self) -> f32 {
        self.blocks().iter().map(|(layout, _, _)| layout.height()).sum()
    }

    fn blocks(&self) -> [(&LayoutBox, FontFace, Color); 5] {
        [
            (&self.title, FontFace::Bold, HEADING_COLOR),
            (&self.details, FontFace::Regular, BODY_COLOR),
            (&self.metrics, FontFace::Regular, BODY_COLOR),
            (&self.amenities, FontFace::Regular, BODY_COLOR),
            (&self.badges, FontFace::Regular, MUTED_COLOR),
        ]
    }
}

fn card_text_width(ctx: &ComposeContext<'_>) -> f32 {
    ctx.content_width() - 2.0 * ctx.config.card_text_indent
}

fn details_text(record: &CompetitorRecord) -> String {
    let counts = [
        format!("{} {}", record.guests, labels::CARD_GUESTS),
        format!("{} {}", record.bedrooms, labels::CARD_BEDROOMS),
        format!("{} {}", format::count(record.baths), labels::CARD_BATHS),
    ];
    let listing_type = record.listing_type.trim();
    if listing_type.is_empty() {
        counts.join(labels::SEPARATOR)
    } else {
        format!("{listing_type}{}{}", labels::SEPARATOR, counts.join(labels::SEPARATOR))
    }
}

fn metrics_text(record: &CompetitorRecord, currency: Currency) -> String {
    let rating = match record.rating {
        Some(r) => format!("{r:.1}/5"),
        None => labels::CARD_RATING_MISSING.to_string(),
    };
    [
        format!("{}: {}", labels::CARD_RATE, format::currency(record.average_rate, currency)),
        format!(
            "{}: {}",
            labels::CARD_OCCUPANCY,
            format::percent(Some(record.occupancy.unwrap_or(0.0)), 1)
        ),
        format!("{}: {} ({rating})", labels::CARD_REVIEWS, record.review_count),
    ]
    .join(labels::SEPARATOR)
}

fn amenities_text(record: &CompetitorRecord) -> Option<String> {
    if record.amenities.is_empty() {
        return None;
    }
    let shown = record
        .amenities
        .iter()
        .take(MAX_AMENITIES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    let more = if record.amenities.len() > MAX_AMENITIES {
        crate::layout::ELLIPSIS
    } else {
        ""
    };
    Some(format!("{}: {shown}{more}", labels::CARD_AMENITIES))
}

fn badges_text(record: &CompetitorRecord) -> Option<String> {
    let mut badges = Vec::new();
    if record.instant_book {
        badges.push(labels::BADGE_INSTANT_BOOK.to_string());
    }
    if record.min_nights > 1 {
        badges.push(labels::min_nights_badge(record.min_nights));
    }
    if record.registered {
        badges.push(labels::BADGE_REGISTERED.to_string());
    }
    (!badges.is_empty()).then(|| badges.join(labels::SEPARATOR))
}

// ────────────────────────────────────────────────────────────────────────────
// Placement
// ────────────────────────────────────────────────────────────────────────────

/// Section heading shown above the first card.
pub fn compose_competitor_heading(ctx: &ComposeContext<'_>, cursor: PageCursor) -> PlacementResult {
    let config = ctx.config;
    let cursor = ctx.flow.ensure_space(cursor, config.competitor_reserve);
    let (heading, cursor) =
        ctx.heading(labels::COMPETITOR_HEADING, cursor, config.list_heading_advance);
    PlacementResult {
        cursor,
        draw_ops: vec![heading],
    }
}

/// Places one card at `cursor`.
///
/// `retry` is false on the first call; the function calls itself once with
/// `retry = true` when the image has to move to a fresh page.
pub fn place_card(
    ctx: &ComposeContext<'_>,
    layout: &CardLayout,
    image: Option<&ResolvedImage>,
    index: usize,
    cursor: PageCursor,
    retry: bool,
) -> PlacementResult {
    let config = ctx.config;
    let text_height = config.card_padding + layout.text_height();
    let start = ctx.flow.ensure_space(cursor, text_height);

    let mut image = image.map(|img| {
        let size = img.fit_within(config.card_image_width, config.card_image_height);
        (img, size)
    });

    if let Some((_, (_, image_height))) = image {
        let needed = text_height + config.card_image_gap + image_height;
        if !ctx.flow.fits(start, needed) {
            if !retry && !ctx.flow.at_page_top(start) {
                info!(
                    card = index,
                    page = start.page_index,
                    "card image would be clipped, moving card to next page"
                );
                let fresh = ctx.flow.break_page(start);
                let image = image.map(|(img, _)| img);
                return place_card(ctx, layout, image, index, fresh, true);
            }
            warn!(
                card = index,
                page = start.page_index,
                "card image does not fit on a fresh page, dropping it"
            );
            image = None;
        }
    }

    let page = start.page_index;
    let x = ctx.left() + config.card_text_indent;
    let mut y = start.y_offset + config.card_padding;
    let mut draw_ops = Vec::new();

    for (block, face, color) in layout.blocks() {
        draw_ops.extend(layout_ops(block, page, x, y, face, color));
        y += block.height();
    }

    if let Some((img, (width, height))) = image {
        let top = y + config.card_image_gap;
        draw_ops.push(DrawOp::Image(ImageOp {
            page,
            x,
            y: top,
            width,
            height,
            image: img.clone(),
        }));
        y = top + height;
    }

    let bottom_limit = config.geometry.bottom_limit();
    let card_height = (y + config.card_padding).min(bottom_limit) - start.y_offset;
    draw_ops.insert(
        0,
        DrawOp::Rect(RectOp {
            page,
            x: ctx.left(),
            y: start.y_offset,
            width: ctx.content_width(),
            height: card_height,
            fill: if index % 2 == 0 { WHITE } else { PANEL_FILL },
        }),
    );

    debug!(card = index, page, y = start.y_offset, height = card_height, "card placed");

    let cursor = ctx.flow.advance(start, card_height);
    PlacementResult {
        cursor: ctx.flow.gap(cursor, config.card_gap),
        draw_ops,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
