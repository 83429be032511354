//! In-memory SVG rendering of the scene.
//!
//! One rectangle and label per tracked box, one line per edge segment. Only
//! boxes render; grouping and wrapper elements are invisible. The viewport
//! offset is baked into every coordinate, and the canvas is sized to the
//! content bounds plus a fixed margin.

use log::debug;

use svg::Document as SvgDocument;
use svg::node::element::{Line, Rectangle, Text};

use trellis_core::geometry::{Bounds, Insets, Point, Rect};
use trellis_core::identifier::NodeId;

use crate::config::StyleConfig;
use crate::document::Document;
use crate::layout::Layout;
use crate::scene::Scene;
use crate::structure::GraphStore;

const CANVAS_MARGIN: f32 = 50.0;

/// Renders the scene into an [`svg::Document`].
pub struct SvgRenderer<'a> {
    style: &'a StyleConfig,
}

impl<'a> SvgRenderer<'a> {
    /// Creates a renderer with the given style settings.
    pub fn new(style: &'a StyleConfig) -> Self {
        Self { style }
    }

    /// Renders every tracked box and live segment.
    pub fn render(
        &self,
        document: &Document,
        store: &GraphStore,
        scene: &Scene,
        layout: &Layout,
    ) -> SvgDocument {
        let offset = scene.viewport();
        let mut boxes: Vec<_> = store.nodes().collect();
        boxes.sort();

        let bounds = self.content_bounds(document, scene, layout, &boxes);
        let mut doc = SvgDocument::new()
            .set(
                "viewBox",
                format!(
                    "{} {} {} {}",
                    bounds.min_x(),
                    bounds.min_y(),
                    bounds.width(),
                    bounds.height()
                ),
            )
            .set("width", bounds.width())
            .set("height", bounds.height());

        for (_, segment) in scene.segments() {
            let start = segment.start().add_point(offset);
            let end = segment.end().add_point(offset);
            doc = doc.add(
                Line::new()
                    .set("x1", start.x())
                    .set("y1", start.y())
                    .set("x2", end.x())
                    .set("y2", end.y())
                    .set("stroke", "black")
                    .set("stroke-width", self.style.stroke_width()),
            );
        }

        for node in boxes {
            let rect = layout.rect(document, node);
            let origin = rect.origin().add_point(offset);
            doc = doc.add(
                Rectangle::new()
                    .set("x", origin.x())
                    .set("y", origin.y())
                    .set("width", rect.size().width())
                    .set("height", rect.size().height())
                    .set("fill", "white")
                    .set("stroke", "black")
                    .set("stroke-width", self.style.stroke_width()),
            );
            doc = doc.add(
                Text::new(document.node_unchecked(node).text())
                    .set("x", rect.center_x() + offset.x())
                    .set("y", origin.y() + rect.size().height() / 2.0)
                    .set("text-anchor", "middle")
                    .set("dominant-baseline", "middle")
                    .set("font-family", "Arial")
                    .set("font-size", self.style.font_size()),
            );
        }

        debug!(
            width = bounds.width(),
            height = bounds.height(),
            segments = scene.len();
            "SVG document rendered"
        );
        doc
    }

    /// Renders directly to an SVG string.
    pub fn render_to_string(
        &self,
        document: &Document,
        store: &GraphStore,
        scene: &Scene,
        layout: &Layout,
    ) -> String {
        self.render(document, store, scene, layout).to_string()
    }

    fn content_bounds(
        &self,
        document: &Document,
        scene: &Scene,
        layout: &Layout,
        boxes: &[NodeId],
    ) -> Bounds {
        let offset = scene.viewport();
        let mut bounds: Option<Bounds> = None;
        let mut merge = |b: Bounds| {
            bounds = Some(match bounds {
                Some(acc) => acc.merge(&b),
                None => b,
            });
        };

        for &node in boxes {
            let rect = layout.rect(document, node);
            let shifted = Rect::new(rect.origin().add_point(offset), rect.size());
            merge(shifted.to_bounds());
        }
        for (_, segment) in scene.segments() {
            merge(Bounds::from_point(segment.start().add_point(offset)));
            merge(Bounds::from_point(segment.end().add_point(offset)));
        }

        bounds
            .unwrap_or_else(|| Bounds::from_point(Point::default()))
            .add_padding(Insets::uniform(CANVAS_MARGIN))
    }
}
