// Layout primitives: text measurement, wrapping, font fitting and page flow.
// Everything here is synchronous and deterministic; composers build on top.

pub mod font_fit;
pub mod font_metrics;
pub mod line_wrap;
pub mod page_flow;

pub use font_metrics::{FontFace, StandardFontMeasurer, TextMeasure, MM_PER_PT};
pub use line_wrap::{LayoutBox, LineWrapper, TextBudget, ELLIPSIS};
pub use page_flow::{PageCursor, PageFlow, PageGeometry};
