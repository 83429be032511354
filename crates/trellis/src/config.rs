//! Configuration types for Trellis layout and rendering.
//!
//! This module provides configuration structures that control how trees are
//! laid out and styled. All types implement [`serde::Deserialize`] for
//! flexible loading from external sources; every field has a default, so a
//! partial TOML file only overrides what it names.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining layout and style settings.
//! - [`LayoutConfig`] - Spacing and anchoring parameters for the layout engine.
//! - [`StyleConfig`] - Node sizing and stroke options for measurement and export.

use serde::Deserialize;

use trellis_core::geometry::{Insets, Size};
use trellis_core::measure::TextMetrics;

/// Top-level application configuration combining layout and style settings.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Layout configuration section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Style configuration section.
    #[serde(default)]
    style: StyleConfig,

    /// Depth passed to the learn oracle when expanding a leaf.
    #[serde(default = "default_learn_depth")]
    learn_depth: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            style: StyleConfig::default(),
            learn_depth: default_learn_depth(),
        }
    }
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified layout and style
    /// configurations and the default learn depth.
    pub fn new(layout: LayoutConfig, style: StyleConfig) -> Self {
        Self {
            layout,
            style,
            learn_depth: default_learn_depth(),
        }
    }

    /// Returns the layout configuration.
    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    /// Returns the style configuration.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// Returns the oracle expansion depth.
    pub fn learn_depth(&self) -> usize {
        self.learn_depth
    }
}

/// Spacing and anchoring parameters for the layout engine.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Horizontal breathing room reserved around every node.
    margin: f32,

    /// Vertical gap between a node and its children, as a multiple of the
    /// node's height.
    branch_height_factor: f32,

    /// Horizontal anchor for the entry node of a freshly loaded tree.
    anchor_x: f32,

    /// Vertical anchor for the entry node of a freshly loaded tree.
    anchor_y: f32,

    /// Viewport shift per pan step.
    pan_step: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 15.0,
            branch_height_factor: 1.5,
            anchor_x: 400.0,
            anchor_y: 100.0,
            pan_step: 50.0,
        }
    }
}

impl LayoutConfig {
    /// Returns the horizontal margin reserved around every node.
    pub fn margin(&self) -> f32 {
        self.margin
    }

    /// Returns the vertical branch spacing factor.
    pub fn branch_height_factor(&self) -> f32 {
        self.branch_height_factor
    }

    /// Returns the horizontal anchor used at load.
    pub fn anchor_x(&self) -> f32 {
        self.anchor_x
    }

    /// Returns the vertical anchor used at load.
    pub fn anchor_y(&self) -> f32 {
        self.anchor_y
    }

    /// Returns the viewport shift applied per pan step.
    pub fn pan_step(&self) -> f32 {
        self.pan_step
    }
}

/// Node sizing and stroke options.
///
/// Boxes are measured headlessly from their label text; these settings feed
/// that measurement and the SVG export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Label font size in pixels.
    font_size: f32,

    /// Uniform padding between a label and its box border.
    padding: f32,

    /// Minimum box width.
    min_width: f32,

    /// Minimum box height.
    min_height: f32,

    /// Extra height a box gains while it carries a select affordance.
    affordance_height: f32,

    /// Stroke width for exported edges and box borders.
    stroke_width: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_size: 14.0,
            padding: 6.0,
            min_width: 40.0,
            min_height: 24.0,
            affordance_height: 18.0,
            stroke_width: 1.0,
        }
    }
}

impl StyleConfig {
    /// Returns the label font size.
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Returns the label padding.
    pub fn padding(&self) -> f32 {
        self.padding
    }

    /// Returns the extra height carried by a select affordance.
    pub fn affordance_height(&self) -> f32 {
        self.affordance_height
    }

    /// Returns the stroke width for exported edges and borders.
    pub fn stroke_width(&self) -> f32 {
        self.stroke_width
    }

    /// Measures the footprint of a box with the given label: text size plus
    /// padding, clamped to the configured minimums.
    pub fn measure_box(&self, label: &str) -> Size {
        TextMetrics::new(self.font_size)
            .measure(label)
            .add_padding(Insets::uniform(self.padding))
            .max(Size::new(self.min_width, self.min_height))
    }
}

fn default_learn_depth() -> usize {
    1
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_approx_eq!(f32, config.layout().margin(), 15.0);
        assert_approx_eq!(f32, config.layout().branch_height_factor(), 1.5);
        assert_approx_eq!(f32, config.layout().pan_step(), 50.0);
        assert_eq!(config.learn_depth(), 1);
    }

    #[test]
    fn test_measure_box_clamps_to_minimums() {
        let style = StyleConfig::default();

        let tiny = style.measure_box("a");
        assert_approx_eq!(f32, tiny.width(), 40.0);
        assert_approx_eq!(f32, tiny.height(), 28.8); // 14 * 1.2 + 2 * 6

        let wide = style.measure_box("a much longer label");
        assert!(wide.width() > tiny.width());
    }

    #[test]
    fn test_partial_toml_overrides() {
        let config: AppConfig = toml::from_str(
            r#"
            [layout]
            margin = 20.0
            "#,
        )
        .unwrap();

        assert_approx_eq!(f32, config.layout().margin(), 20.0);
        assert_approx_eq!(f32, config.layout().branch_height_factor(), 1.5);
    }
}
