//! Exporters for the rendered scene.

pub mod svg;

pub use svg::SvgRenderer;
