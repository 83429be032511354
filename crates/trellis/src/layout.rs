//! The layout engine: subtree widths and non-overlapping placement.
//!
//! Layout is a two-pass recursion over the graph rooted at a node. The
//! width pass reserves, bottom-up, enough horizontal room for every subtree
//! so siblings can never overlap; the placement pass then walks top-down,
//! centering each node's children under it and advancing left-to-right by
//! the reserved widths. The width cache is valid for one placement pass
//! only and is recomputed from scratch each time.
//!
//! Layout assumes the graph reachable from the root is a tree. The builder
//! never introduces cycles; a cyclic store would recurse forever here.

use std::collections::HashMap;

use log::debug;

use trellis_core::geometry::{Point, Rect};
use trellis_core::identifier::NodeId;

use crate::config::LayoutConfig;
use crate::document::Document;
use crate::scene::Scene;
use crate::structure::GraphStore;

/// Node positions plus the per-pass width cache.
#[derive(Debug)]
pub struct Layout {
    positions: HashMap<NodeId, Point>,
    widths: HashMap<NodeId, f32>,
    margin: f32,
    branch_height_factor: f32,
}

impl Layout {
    /// Creates a layout engine with the given spacing parameters.
    pub fn new(config: &LayoutConfig) -> Self {
        Self {
            positions: HashMap::new(),
            widths: HashMap::new(),
            margin: config.margin(),
            branch_height_factor: config.branch_height_factor(),
        }
    }

    /// Returns the current top-left position of a node, if it has one.
    pub fn position(&self, node: NodeId) -> Option<Point> {
        self.positions.get(&node).copied()
    }

    /// Returns a node's screen rectangle from its position and footprint.
    /// Unplaced nodes sit at the origin.
    pub fn rect(&self, document: &Document, node: NodeId) -> Rect {
        Rect::new(
            self.position(node).unwrap_or_default(),
            document.node_unchecked(node).size(),
        )
    }

    /// Returns the reserved width computed for `node` by the most recent
    /// placement pass.
    pub fn subtree_width(&self, node: NodeId) -> Option<f32> {
        self.widths.get(&node).copied()
    }

    /// Moves one node to `position` and re-pins its incident edges.
    ///
    /// This is the drag primitive: descendants do not follow.
    pub fn move_node(
        &mut self,
        document: &Document,
        store: &GraphStore,
        scene: &mut Scene,
        node: NodeId,
        position: Point,
    ) {
        self.positions.insert(node, position);
        scene.sync_node(store.record(node), self.rect(document, node));
    }

    /// Lays out the subtree rooted at `root` with its top-left corner at
    /// `(x, y)`.
    ///
    /// Runs the width pass first, then places every descendant and re-pins
    /// its edges.
    pub fn place(
        &mut self,
        document: &Document,
        store: &GraphStore,
        scene: &mut Scene,
        root: NodeId,
        x: f32,
        y: f32,
    ) {
        self.widths.clear();
        let reserved = self.width_of(document, store, root);
        debug!(root:% = root, reserved; "placing subtree");
        self.place_inner(document, store, scene, root, x, y);
    }

    /// Bottom-up width pass.
    ///
    /// A leaf reserves its own width plus the margin; an internal node
    /// reserves the larger of that and the sum of its children's
    /// reservations.
    fn width_of(&mut self, document: &Document, store: &GraphStore, node: NodeId) -> f32 {
        let children: Vec<NodeId> = store.record(node).children().collect();
        let own = document.node_unchecked(node).size().width() + self.margin;

        let width = if children.is_empty() {
            own
        } else {
            let total: f32 = children
                .iter()
                .map(|&child| self.width_of(document, store, child))
                .sum();
            own.max(total)
        };
        self.widths.insert(node, width);
        width
    }

    fn place_inner(
        &mut self,
        document: &Document,
        store: &GraphStore,
        scene: &mut Scene,
        node: NodeId,
        x: f32,
        y: f32,
    ) {
        self.move_node(document, store, scene, node, Point::new(x, y));
        let rect = self.rect(document, node);

        let children: Vec<NodeId> = store.record(node).children().collect();
        if children.is_empty() {
            return;
        }

        let total: f32 = children.iter().map(|child| self.widths[child]).sum();
        let mut child_x = rect.center_x() - total / 2.0;
        let child_y = y + self.branch_height_factor * rect.size().height();

        for child in children {
            let reserved = self.widths[&child];
            self.place_inner(document, store, scene, child, child_x, child_y);
            child_x += reserved;
        }
    }

    /// Drops the position and cached width of a node that left the scene.
    pub fn forget(&mut self, node: NodeId) {
        self.positions.remove(&node);
        self.widths.remove(&node);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use trellis_core::geometry::Size;
    use trellis_core::markup::Markup;

    use crate::config::{AppConfig, StyleConfig};
    use crate::document::Document;
    use crate::scene::Scene;
    use crate::structure::GraphStore;

    use super::*;

    /// A parent box and two children with hand-set footprints, wired
    /// directly into the store.
    fn fixture(
        parent_w: f32,
        child_w: f32,
    ) -> (Document, GraphStore, Scene, Layout, [NodeId; 3]) {
        let style = StyleConfig::default();
        let mut doc = Document::new();
        let boxes: Vec<NodeId> = ["p", "a", "b"]
            .iter()
            .map(|label| {
                doc.instantiate(
                    &Markup::element("div").with_class("box").with_text(*label),
                    &style,
                )
            })
            .collect();
        doc.set_measured_size(boxes[0], Size::new(parent_w, 40.0));
        doc.set_measured_size(boxes[1], Size::new(child_w, 40.0));
        doc.set_measured_size(boxes[2], Size::new(child_w, 40.0));

        let mut store = GraphStore::new();
        let mut scene = Scene::new();
        let layout = Layout::new(AppConfig::default().layout());
        for &child in &boxes[1..] {
            let edge = scene.connect(
                boxes[0],
                Rect::default(),
                child,
                Rect::default(),
            );
            store.add_edge(boxes[0], child, edge);
        }

        (doc, store, scene, layout, [boxes[0], boxes[1], boxes[2]])
    }

    #[test]
    fn test_leaf_width_is_own_plus_margin() {
        let (doc, mut store, _scene, mut layout, [_, a, _]) = fixture(100.0, 80.0);
        store.ensure_tracked(a);

        assert_approx_eq!(f32, layout.width_of(&doc, &store, a), 95.0);
    }

    #[test]
    fn test_parent_width_takes_children_when_wider() {
        let (doc, store, _scene, mut layout, [p, _, _]) = fixture(100.0, 80.0);

        // max(100 + 15, 95 + 95)
        assert_approx_eq!(f32, layout.width_of(&doc, &store, p), 190.0);
    }

    #[test]
    fn test_parent_width_takes_own_when_wider() {
        let (doc, store, _scene, mut layout, [p, _, _]) = fixture(300.0, 20.0);

        // max(300 + 15, 35 + 35)
        assert_approx_eq!(f32, layout.width_of(&doc, &store, p), 315.0);
    }

    #[test]
    fn test_place_centers_children_under_parent() {
        let (doc, store, mut scene, mut layout, [p, a, b]) = fixture(100.0, 80.0);

        layout.place(&doc, &store, &mut scene, p, 200.0, 100.0);

        // Parent top-left lands exactly at the requested anchor.
        assert_eq!(layout.position(p), Some(Point::new(200.0, 100.0)));

        // Children sit one branch step below: 100 + 1.5 * 40.
        assert_approx_eq!(f32, layout.position(a).unwrap().y(), 160.0);
        assert_approx_eq!(f32, layout.position(b).unwrap().y(), 160.0);

        // Reserved slots start at parent center minus half the total.
        let center = 200.0 + 50.0;
        assert_approx_eq!(f32, layout.position(a).unwrap().x(), center - 95.0);
        assert_approx_eq!(f32, layout.position(b).unwrap().x(), center);

        // Sibling centers are a full reservation apart.
        let a_center = layout.rect(&doc, a).center_x();
        let b_center = layout.rect(&doc, b).center_x();
        assert_approx_eq!(f32, b_center - a_center, 95.0);
    }

    #[test]
    fn test_place_repins_edges() {
        let (doc, store, mut scene, mut layout, [p, a, _]) = fixture(100.0, 80.0);

        layout.place(&doc, &store, &mut scene, p, 0.0, 0.0);

        let edge = store.record(a).to_edges().next().unwrap();
        let segment = scene.segment_unchecked(edge);
        assert_eq!(segment.start(), layout.rect(&doc, p).anchor_bottom());
        assert_eq!(segment.end(), layout.rect(&doc, a).anchor_top());
    }

    #[test]
    fn test_sibling_reservations_do_not_overlap() {
        let (doc, store, mut scene, mut layout, [p, a, b]) = fixture(10.0, 120.0);

        layout.place(&doc, &store, &mut scene, p, 0.0, 0.0);

        let a_left = layout.position(a).unwrap().x();
        let b_left = layout.position(b).unwrap().x();
        let a_reserved = layout.subtree_width(a).unwrap();
        assert!(a_left + a_reserved <= b_left + f32::EPSILON);
    }

    #[test]
    fn test_move_node_leaves_descendants() {
        let (doc, store, mut scene, mut layout, [p, a, _]) = fixture(100.0, 80.0);
        layout.place(&doc, &store, &mut scene, p, 0.0, 0.0);
        let a_before = layout.position(a).unwrap();

        layout.move_node(&doc, &store, &mut scene, p, Point::new(500.0, 500.0));

        assert_eq!(layout.position(a), Some(a_before));
        let edge = store.record(a).to_edges().next().unwrap();
        // The shared edge follows the moved parent but stays pinned to the
        // unmoved child.
        assert_eq!(
            scene.segment_unchecked(edge).start(),
            layout.rect(&doc, p).anchor_bottom()
        );
        assert_eq!(
            scene.segment_unchecked(edge).end(),
            layout.rect(&doc, a).anchor_top()
        );
    }
}
