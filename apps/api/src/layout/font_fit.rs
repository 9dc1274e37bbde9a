//! Font fitting: picks the largest font size whose wrap fits a line budget.

use crate::layout::line_wrap::{LayoutBox, LineWrapper, TextBudget};

/// Tries each candidate size from largest to smallest and returns the first
/// layout that holds the text within `budget`.
///
/// A size is also accepted when its only truncation comes from the character
/// cap: a smaller size cannot change a character count, so it would draw the
/// same lines smaller. If width truncates at every size, the smallest
/// candidate's truncated layout is returned.
///
/// # Panics
/// If `sizes_descending` is empty.
pub fn fit(
    wrapper: &LineWrapper<'_>,
    text: &str,
    max_width: f32,
    sizes_descending: &[f32],
    budget: TextBudget,
) -> LayoutBox {
    let Some((&smallest, larger)) = sizes_descending.split_last() else {
        panic!("font fitting requires at least one candidate size");
    };

    // Lines as bounded by the character cap alone; identical at every size.
    let cap_bound = wrapper.wrap(text, f32::INFINITY, smallest, budget);

    for &size in larger {
        let layout = wrapper.wrap(text, max_width, size, budget);
        if !layout.truncated || layout.lines == cap_bound.lines {
            return layout;
        }
    }

    wrapper.wrap(text, max_width, smallest, budget)
}

/// Expands an inclusive integer point range into descending candidate sizes.
///
/// `descending_sizes(10, 7)` → `[10.0, 9.0, 8.0, 7.0]`.
pub fn descending_sizes(largest: u8, smallest: u8) -> Vec<f32> {
    (smallest..=largest).rev().map(f32::from).collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
