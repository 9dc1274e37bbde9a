//! Page Flow: the page cursor and every page-break decision.
//!
//! The cursor is a plain `Copy` value. Composers receive one and hand back a new
//! one; nothing mutates a shared position in place, so a block laid out after a
//! page break can never observe a stale offset.
//!
//! # Flow rules
//! - `ensure_space` breaks the page when a block would cross the bottom limit.
//! - A cursor already at the top of a page is never broken again, so a block
//!   taller than the usable area cannot produce blank pages.
//! - `advance` never checks for overflow; callers reserve space first.
//! - `gap` adds spacing between blocks, clamped to the bottom limit.

use tracing::debug;

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Page dimensions and margins in millimetres. Defaults to A4 with 20mm margins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub margin_left: f32,
    pub margin_right: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            margin_top: 20.0,
            margin_bottom: 20.0,
            margin_left: 20.0,
            margin_right: 20.0,
        }
    }
}

impl PageGeometry {
    /// Lowest y offset any block may reach.
    pub fn bottom_limit(&self) -> f32 {
        self.height - self.margin_bottom
    }

    /// Vertical space available on an empty page.
    pub fn usable_height(&self) -> f32 {
        self.bottom_limit() - self.margin_top
    }

    /// Horizontal space between the side margins.
    pub fn content_width(&self) -> f32 {
        self.width - self.margin_left - self.margin_right
    }
}

/// Position of the layout flow: a page index and a top-down offset on that page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageCursor {
    pub page_index: usize,
    pub y_offset: f32,
}

// ────────────────────────────────────────────────────────────────────────────
// Flow
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy)]
pub struct PageFlow {
    geometry: PageGeometry,
}

impl PageFlow {
    pub fn new(geometry: PageGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    /// Cursor at the top of the first page.
    pub fn start(&self) -> PageCursor {
        PageCursor {
            page_index: 0,
            y_offset: self.geometry.margin_top,
        }
    }

    /// True if a block of `height` placed at `cursor` stays above the bottom limit.
    pub fn fits(&self, cursor: PageCursor, height: f32) -> bool {
        cursor.y_offset + height <= self.geometry.bottom_limit()
    }

    /// True if `cursor` sits at the top of its page with nothing placed yet.
    pub fn at_page_top(&self, cursor: PageCursor) -> bool {
        cursor.y_offset <= self.geometry.margin_top
    }

    /// Returns `cursor` unchanged if `required_height` fits on the current page,
    /// otherwise a cursor at the top of the next page.
    pub fn ensure_space(&self, cursor: PageCursor, required_height: f32) -> PageCursor {
        if self.fits(cursor, required_height) || self.at_page_top(cursor) {
            cursor
        } else {
            debug!(
                page = cursor.page_index,
                y = cursor.y_offset,
                required = required_height,
                "page break"
            );
            self.break_page(cursor)
        }
    }

    /// Unconditionally moves to the top of the next page.
    pub fn break_page(&self, cursor: PageCursor) -> PageCursor {
        PageCursor {
            page_index: cursor.page_index + 1,
            y_offset: self.geometry.margin_top,
        }
    }

    /// Moves down by `consumed_height` on the same page. No overflow check.
    pub fn advance(&self, cursor: PageCursor, consumed_height: f32) -> PageCursor {
        PageCursor {
            page_index: cursor.page_index,
            y_offset: cursor.y_offset + consumed_height,
        }
    }

    /// Adds spacing after a block without crossing the bottom limit.
    pub fn gap(&self, cursor: PageCursor, spacing: f32) -> PageCursor {
        PageCursor {
            page_index: cursor.page_index,
            y_offset: (cursor.y_offset + spacing).min(self.geometry.bottom_limit()),
        }
    }

    /// True if the cursor satisfies the flow bounds.
    pub fn in_bounds(&self, cursor: PageCursor) -> bool {
        cursor.y_offset >= self.geometry.margin_top
            && cursor.y_offset <= self.geometry.bottom_limit()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
