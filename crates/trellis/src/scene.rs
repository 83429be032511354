//! The scene: rendered edge segments and the viewport.
//!
//! The scene owns the visual side of every edge: a straight segment from
//! the source box's bottom anchor to the target box's top anchor. The store
//! holds the edge handles; deleting a node removes its handles there and
//! its segments here. The scene also owns the viewport offset used for
//! panning and export translation.

use std::collections::BTreeMap;

use log::trace;

use trellis_core::geometry::{Point, Rect};
use trellis_core::identifier::{EdgeId, NodeId};

use crate::structure::GraphRecord;

/// One rendered connector between two boxes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSegment {
    source: NodeId,
    target: NodeId,
    start: Point,
    end: Point,
}

impl EdgeSegment {
    /// Returns the source box handle.
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// Returns the target box handle.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// Returns the segment's start point (source bottom anchor).
    pub fn start(&self) -> Point {
        self.start
    }

    /// Returns the segment's end point (target top anchor).
    pub fn end(&self) -> Point {
        self.end
    }
}

/// The rendering surface: edge segments plus the viewport offset.
#[derive(Debug, Default)]
pub struct Scene {
    segments: BTreeMap<EdgeId, EdgeSegment>,
    next_edge: u64,
    viewport: Point,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of live segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns true if the scene holds no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Creates a segment between two boxes, with endpoints taken from their
    /// current geometry, and returns its handle. Handles are never reused.
    pub fn connect(&mut self, source: NodeId, source_rect: Rect, target: NodeId, target_rect: Rect) -> EdgeId {
        let edge = EdgeId::from_raw(self.next_edge);
        self.next_edge += 1;
        self.segments.insert(
            edge,
            EdgeSegment {
                source,
                target,
                start: source_rect.anchor_bottom(),
                end: target_rect.anchor_top(),
            },
        );
        trace!(edge:% = edge, source:% = source, target:% = target; "segment created");
        edge
    }

    /// Removes a segment, returning it if it was live.
    pub fn remove(&mut self, edge: EdgeId) -> Option<EdgeSegment> {
        self.segments.remove(&edge)
    }

    /// Returns the segment for an edge handle, if live.
    pub fn segment(&self, edge: EdgeId) -> Option<&EdgeSegment> {
        self.segments.get(&edge)
    }

    /// Returns the segment for an edge handle without checking liveness.
    ///
    /// # Panics
    /// Panics on a stale handle; the store and scene have desynchronized.
    pub fn segment_unchecked(&self, edge: EdgeId) -> &EdgeSegment {
        self.segments
            .get(&edge)
            .unwrap_or_else(|| panic!("edge {edge} is not in the scene"))
    }

    /// Returns all live segments in handle order.
    pub fn segments(&self) -> impl Iterator<Item = (EdgeId, &EdgeSegment)> {
        self.segments.iter().map(|(&edge, segment)| (edge, segment))
    }

    /// Re-pins the endpoints of every edge incident to one node.
    ///
    /// For each edge in the record's `from_edges` the segment source becomes
    /// the midpoint of the node's bottom edge; for each in `to_edges` the
    /// target becomes the midpoint of the top edge. Pure function of the
    /// given geometry, idempotent; call after any geometry change.
    pub fn sync_node(&mut self, record: &GraphRecord, rect: Rect) {
        for edge in record.from_edges() {
            let segment = self
                .segments
                .get_mut(&edge)
                .unwrap_or_else(|| panic!("edge {edge} is not in the scene"));
            segment.start = rect.anchor_bottom();
        }
        for edge in record.to_edges() {
            let segment = self
                .segments
                .get_mut(&edge)
                .unwrap_or_else(|| panic!("edge {edge} is not in the scene"));
            segment.end = rect.anchor_top();
        }
    }

    /// Returns the viewport offset.
    pub fn viewport(&self) -> Point {
        self.viewport
    }

    /// Shifts the viewport by the given delta.
    pub fn pan(&mut self, delta: Point) {
        self.viewport = self.viewport.add_point(delta);
    }
}
