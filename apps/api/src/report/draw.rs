//! Draw operations: the composers' output, replayed onto a canvas later.
//!
//! Coordinates are millimetres from the top-left corner of the page. Text `y`
//! is the baseline; rect and image `y` is the top edge.

use crate::layout::{FontFace, PageCursor, MM_PER_PT};
use crate::report::images::ResolvedImage;

/// Share of the em box above the baseline.
pub const TEXT_ASCENT: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }
}

pub const HEADING_COLOR: Color = Color::rgb(51, 51, 51);
pub const BODY_COLOR: Color = Color::rgb(68, 68, 68);
pub const MUTED_COLOR: Color = Color::gray(100);
pub const FOOTER_COLOR: Color = Color::gray(128);
pub const HIGHLIGHT_COLOR: Color = Color::rgb(220, 53, 69);
pub const PANEL_FILL: Color = Color::rgb(248, 249, 250);
pub const WHITE: Color = Color::gray(255);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub face: FontFace,
    pub size: f32,
    pub color: Color,
}

impl TextStyle {
    pub const fn new(face: FontFace, size: f32, color: Color) -> Self {
        Self { face, size, color }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    /// `x` is the horizontal centre of the line.
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextOp {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub text: String,
    pub style: TextStyle,
    pub align: TextAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectOp {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub fill: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageOp {
    pub page: usize,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub image: ResolvedImage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Text(TextOp),
    Rect(RectOp),
    Image(ImageOp),
}

impl DrawOp {
    pub fn page(&self) -> usize {
        match self {
            DrawOp::Text(op) => op.page,
            DrawOp::Rect(op) => op.page,
            DrawOp::Image(op) => op.page,
        }
    }

    /// Top and bottom edge of the op in millimetres.
    pub fn vertical_extent(&self) -> (f32, f32) {
        match self {
            DrawOp::Text(op) => {
                let em = op.style.size * MM_PER_PT;
                (op.y - em * TEXT_ASCENT, op.y + em * (1.0 - TEXT_ASCENT))
            }
            DrawOp::Rect(op) => (op.y, op.y + op.height),
            DrawOp::Image(op) => (op.y, op.y + op.height),
        }
    }
}

/// What a composer hands back: the cursor after its block and the ops it drew.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacementResult {
    pub cursor: PageCursor,
    pub draw_ops: Vec<DrawOp>,
}

impl PlacementResult {
    /// A composer that draws nothing and leaves the cursor where it was.
    pub fn unchanged(cursor: PageCursor) -> Self {
        Self {
            cursor,
            draw_ops: Vec::new(),
        }
    }
}
