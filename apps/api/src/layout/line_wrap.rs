//! Line wrapping: greedy word-wrap bounded by width AND a character cap.
//!
//! Proportional metrics alone under-truncate text that mixes wide and narrow
//! glyphs, so every line is checked against both the measured width and a plain
//! character count. Both bounds hold for every line this module emits.
//!
//! # Truncation rules
//! - A single word that violates either bound on its own is cut down character by
//!   character and suffixed with `...`.
//! - When the line budget runs out before the input does, the last emitted line is
//!   re-truncated and suffixed with `...`, so clipping is always visible.

use crate::layout::font_metrics::{FontFace, TextMeasure, MM_PER_PT};

/// Marker appended to any truncated word or line.
pub const ELLIPSIS: &str = "...";

// ────────────────────────────────────────────────────────────────────────────
// Types
// ────────────────────────────────────────────────────────────────────────────

/// Line and character limits for a single text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextBudget {
    pub max_lines: usize,
    pub max_chars_per_line: usize,
}

impl TextBudget {
    pub const fn new(max_lines: usize, max_chars_per_line: usize) -> Self {
        Self {
            max_lines,
            max_chars_per_line,
        }
    }
}

/// Wrapped text ready to draw. Immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutBox {
    pub lines: Vec<String>,
    /// Vertical advance per line, in millimetres.
    pub line_height: f32,
    pub font_size: f32,
    /// True if any input text was dropped (clipped word or exhausted line budget).
    pub truncated: bool,
}

impl LayoutBox {
    /// Total height of the block in millimetres.
    pub fn height(&self) -> f32 {
        self.lines.len() as f32 * self.line_height
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Wrapper
// ────────────────────────────────────────────────────────────────────────────

/// Greedy line wrapper for one font face.
///
/// `line_spacing` is a multiplier of the font size (1.0 = solid leading).
pub struct LineWrapper<'a> {
    measurer: &'a dyn TextMeasure,
    face: FontFace,
    line_spacing: f32,
}

impl<'a> LineWrapper<'a> {
    pub fn new(measurer: &'a dyn TextMeasure, face: FontFace, line_spacing: f32) -> Self {
        Self {
            measurer,
            face,
            line_spacing,
        }
    }

    /// Wraps `text` into at most `budget.max_lines` lines.
    ///
    /// Empty or whitespace-only text yields a box with zero lines.
    ///
    /// # Panics
    /// If `budget.max_lines` is zero.
    pub fn wrap(&self, text: &str, max_width: f32, font_size: f32, budget: TextBudget) -> LayoutBox {
        assert!(budget.max_lines > 0, "line budget must allow at least one line");

        let fits = |s: &str| self.fits(s, max_width, font_size, budget);
        let words: Vec<&str> = text.split_whitespace().collect();

        let mut lines: Vec<String> = Vec::new();
        let mut current = String::new();
        let mut truncated = false;
        let mut overflow = false;

        for (i, word) in words.iter().enumerate() {
            let candidate = if current.is_empty() {
                (*word).to_string()
            } else {
                format!("{current} {word}")
            };

            if fits(&candidate) {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                if lines.len() == budget.max_lines {
                    // The word that did not fit is still pending.
                    overflow = true;
                    break;
                }
            }

            if fits(word) {
                current = (*word).to_string();
            } else {
                lines.push(self.ellipsize(word, max_width, font_size, budget));
                truncated = true;
                if lines.len() == budget.max_lines {
                    overflow = i + 1 < words.len();
                    break;
                }
            }
        }

        // `current` is only ever non-empty while the budget has room left.
        if !current.is_empty() {
            lines.push(current);
        }

        if overflow {
            truncated = true;
            if let Some(last) = lines.pop() {
                lines.push(self.ellipsize(&last, max_width, font_size, budget));
            }
        }

        LayoutBox {
            lines,
            line_height: font_size * MM_PER_PT * self.line_spacing,
            font_size,
            truncated,
        }
    }

    fn fits(&self, s: &str, max_width: f32, font_size: f32, budget: TextBudget) -> bool {
        s.chars().count() <= budget.max_chars_per_line
            && self.measurer.text_width(s, self.face, font_size) <= max_width
    }

    /// Shortens `s` one character at a time until `s + "..."` satisfies both bounds.
    ///
    /// Strings that already end in the marker are returned unchanged when they fit.
    fn ellipsize(&self, s: &str, max_width: f32, font_size: f32, budget: TextBudget) -> String {
        if s.ends_with(ELLIPSIS) && self.fits(s, max_width, font_size, budget) {
            return s.to_string();
        }

        // The answer never holds more than the cap, so the search starts there.
        let base = s.strip_suffix(ELLIPSIS).unwrap_or(s);
        let mut chars: Vec<char> = base.chars().take(budget.max_chars_per_line).collect();
        loop {
            let prefix: String = chars.iter().collect();
            let candidate = format!("{}{ELLIPSIS}", prefix.trim_end());
            if chars.is_empty() || self.fits(&candidate, max_width, font_size, budget) {
                if self.fits(&candidate, max_width, font_size, budget) {
                    return candidate;
                }
                // Degenerate budget narrower than the marker itself.
                return ELLIPSIS.chars().take(budget.max_chars_per_line).collect();
            }
            chars.pop();
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::StandardFontMeasurer;

    const WIDE: f32 = 1000.0;

    fn wrapper() -> LineWrapper<'static> {
        LineWrapper::new(&StandardFontMeasurer, FontFace::Regular, 1.2)
    }

    fn assert_within_budget(layout: &LayoutBox, budget: TextBudget) {
        assert!(layout.lines.len() <= budget.max_lines, "{layout:?}");
        for line in &layout.lines {
            assert!(
                line.chars().count() <= budget.max_chars_per_line,
                "line {line:?} exceeds {} chars",
                budget.max_chars_per_line
            );
        }
    }

    // ── basic wrapping ──────────────────────────────────────────────────────

    #[test]
    fn test_empty_text_yields_zero_lines() {
        let layout = wrapper().wrap("", WIDE, 10.0, TextBudget::new(2, 40));
        assert!(layout.is_empty());
        assert!(!layout.truncated);
        assert_eq!(layout.height(), 0.0);
    }

    #[test]
    fn test_whitespace_only_yields_zero_lines() {
        let layout = wrapper().wrap("   \t  ", WIDE, 10.0, TextBudget::new(2, 40));
        assert!(layout.is_empty());
    }

    #[test]
    fn test_short_text_single_line() {
        let layout = wrapper().wrap("Appartamento in centro", WIDE, 10.0, TextBudget::new(2, 40));
        assert_eq!(layout.lines, vec!["Appartamento in centro"]);
        assert!(!layout.truncated);
    }

    #[test]
    fn test_char_cap_forces_break() {
        let layout = wrapper().wrap("aaaa bbbb cccc", WIDE, 10.0, TextBudget::new(3, 9));
        assert_eq!(layout.lines, vec!["aaaa bbbb", "cccc"]);
        assert!(!layout.truncated);
    }

    #[test]
    fn test_width_forces_break() {
        let w = wrapper();
        let one_word = StandardFontMeasurer.text_width("aaaa bbbb", FontFace::Regular, 10.0);
        let layout = w.wrap("aaaa bbbb cccc", one_word + 0.01, 10.0, TextBudget::new(3, 100));
        assert_eq!(layout.lines, vec!["aaaa bbbb", "cccc"]);
    }

    #[test]
    fn test_collapses_repeated_whitespace() {
        let layout = wrapper().wrap("uno   due\n tre", WIDE, 10.0, TextBudget::new(1, 40));
        assert_eq!(layout.lines, vec!["uno due tre"]);
    }

    // ── truncation ──────────────────────────────────────────────────────────

    #[test]
    fn test_overflow_ellipsizes_last_line() {
        let title = "word ".repeat(24); // 120 characters
        let budget = TextBudget::new(2, 40);
        let layout = wrapper().wrap(&title, WIDE, 10.0, budget);
        assert_eq!(layout.lines.len(), 2);
        assert!(layout.lines[1].ends_with(ELLIPSIS), "{:?}", layout.lines);
        assert!(layout.truncated);
        assert_within_budget(&layout, budget);
    }

    #[test]
    fn test_oversized_word_truncated_with_ellipsis() {
        let budget = TextBudget::new(2, 10);
        let layout = wrapper().wrap("Supercalifragilistichespiralidoso", WIDE, 10.0, budget);
        assert_eq!(layout.lines.len(), 1);
        assert!(layout.lines[0].ends_with(ELLIPSIS));
        assert_eq!(layout.lines[0].chars().count(), 10);
        assert!(layout.truncated);
    }

    #[test]
    fn test_oversized_word_by_width() {
        let w = wrapper();
        let max_width = StandardFontMeasurer.text_width("abcdef", FontFace::Regular, 10.0);
        let layout = w.wrap("abcdefghijklmnop", max_width, 10.0, TextBudget::new(1, 100));
        let line = &layout.lines[0];
        assert!(line.ends_with(ELLIPSIS));
        assert!(StandardFontMeasurer.text_width(line, FontFace::Regular, 10.0) <= max_width);
    }

    #[test]
    fn test_oversized_word_followed_by_more_words() {
        let budget = TextBudget::new(3, 8);
        let layout = wrapper().wrap("abcdefghijkl mn op", WIDE, 10.0, budget);
        assert_eq!(layout.lines, vec!["abcde...", "mn op"]);
        assert_within_budget(&layout, budget);
    }

    #[test]
    fn test_clipped_last_word_no_extra_overflow_marker() {
        // The clipped word already carries the marker; it must not be doubled.
        let layout = wrapper().wrap("ok abcdefghijkl", WIDE, 10.0, TextBudget::new(2, 8));
        assert_eq!(layout.lines, vec!["ok", "abcde..."]);
    }

    #[test]
    fn test_very_long_word_truncated_to_cap() {
        let word = "a".repeat(100_000);
        let budget = TextBudget::new(2, 40);
        let layout = wrapper().wrap(&word, 150.0, 10.0, budget);
        assert_eq!(layout.lines.len(), 1);
        assert!(layout.truncated);
        let line = &layout.lines[0];
        assert!(line.ends_with(ELLIPSIS));
        assert!(line.chars().count() <= 40);
        assert!(line.starts_with("aaaa"));
        assert!(StandardFontMeasurer.text_width(line, FontFace::Regular, 10.0) <= 150.0);
    }

    #[test]
    fn test_exact_fit_is_not_truncated() {
        let layout = wrapper().wrap("aaaa bbbb", WIDE, 10.0, TextBudget::new(1, 9));
        assert_eq!(layout.lines, vec!["aaaa bbbb"]);
        assert!(!layout.truncated);
    }

    #[test]
    fn test_non_ascii_counts_chars_not_bytes() {
        // "città" is 5 chars but 6 bytes
        let layout = wrapper().wrap("città città", WIDE, 10.0, TextBudget::new(1, 11));
        assert_eq!(layout.lines, vec!["città città"]);
    }

    #[test]
    fn test_budget_property_over_many_inputs() {
        let samples = [
            "Splendido attico con vista mare e terrazza panoramica sul golfo di Napoli",
            "WWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWWW",
            "a b c d e f g h i j k l m n o p q r s t u v w x y z",
            "iiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiiii mmmm",
        ];
        let budgets = [TextBudget::new(1, 20), TextBudget::new(2, 40), TextBudget::new(3, 12)];
        for text in samples {
            for budget in budgets {
                for width in [20.0_f32, 60.0, 170.0] {
                    let layout = wrapper().wrap(text, width, 9.0, budget);
                    assert_within_budget(&layout, budget);
                    for line in &layout.lines {
                        let w = StandardFontMeasurer.text_width(line, FontFace::Regular, 9.0);
                        assert!(w <= width, "line {line:?} is {w}mm wide, max {width}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_line_height_scales_with_font_size() {
        let w = wrapper();
        let small = w.wrap("testo", WIDE, 8.0, TextBudget::new(1, 40));
        let large = w.wrap("testo", WIDE, 16.0, TextBudget::new(1, 40));
        assert!((large.line_height - 2.0 * small.line_height).abs() < 1e-4);
    }

    #[test]
    #[should_panic(expected = "line budget")]
    fn test_zero_max_lines_panics() {
        wrapper().wrap("testo", WIDE, 10.0, TextBudget::new(0, 40));
    }
}
