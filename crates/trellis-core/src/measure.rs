//! Deterministic text measurement for node sizing.
//!
//! The layout engine sizes a box from the text it displays. Rendering
//! happens headless, so instead of shaping real glyphs we use a fixed
//! per-character advance derived from the font size. The same label always
//! measures the same, which keeps layout reproducible across runs and in
//! tests.

use crate::geometry::Size;

/// Average glyph advance as a fraction of the font size.
const CHAR_ADVANCE_FACTOR: f32 = 0.6;
/// Line height as a fraction of the font size.
const LINE_HEIGHT_FACTOR: f32 = 1.2;

/// Text measurement with a fixed font size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    font_size: f32,
}

impl TextMetrics {
    /// Creates metrics for the given font size in pixels.
    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }

    /// Returns the font size these metrics were built for.
    pub fn font_size(self) -> f32 {
        self.font_size
    }

    /// Returns the height of a single line of text.
    pub fn line_height(self) -> f32 {
        self.font_size * LINE_HEIGHT_FACTOR
    }

    /// Measures a single-line label.
    ///
    /// Width scales with the number of characters; an empty label still
    /// occupies one line of height so empty boxes keep a visible extent.
    pub fn measure(self, text: &str) -> Size {
        let width = text.chars().count() as f32 * (self.font_size * CHAR_ADVANCE_FACTOR);
        Size::new(width, self.line_height())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_cmp::assert_approx_eq;

    #[test]
    fn test_measure_scales_with_length() {
        let metrics = TextMetrics::new(10.0);

        let short = metrics.measure("ab");
        let long = metrics.measure("abcd");

        assert_approx_eq!(f32, short.width(), 12.0);
        assert_approx_eq!(f32, long.width(), 24.0);
        assert_approx_eq!(f32, short.height(), 12.0);
        assert_approx_eq!(f32, long.height(), short.height());
    }

    #[test]
    fn test_measure_counts_chars_not_bytes() {
        let metrics = TextMetrics::new(10.0);

        assert_approx_eq!(
            f32,
            metrics.measure("äöü").width(),
            metrics.measure("abc").width()
        );
    }

    #[test]
    fn test_empty_label_keeps_line_height() {
        let metrics = TextMetrics::new(14.0);
        let size = metrics.measure("");

        assert_approx_eq!(f32, size.width(), 0.0);
        assert_approx_eq!(f32, size.height(), 16.8);
    }
}
