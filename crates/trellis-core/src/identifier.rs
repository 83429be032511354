//! Opaque handles for document nodes and rendered edges.
//!
//! The engine never addresses nodes by reference identity of a live rendering
//! element; instead every node and edge is identified by a stable numeric
//! handle issued by its owner (the document arena for nodes, the scene for
//! edges). Handles are `Copy`, hashable and ordered, so they can live in
//! adjacency sets long after the element they name has been pruned; stale
//! handles are detected by the owner at lookup time rather than aliased.

use std::fmt;

/// Stable handle for a node in the document arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Creates a node handle from a raw arena index.
    ///
    /// Only the document arena should mint these; everything else treats the
    /// handle as opaque.
    pub fn from_raw(index: u32) -> Self {
        NodeId(index)
    }

    /// Returns the raw arena index backing this handle.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Stable handle for an edge segment on the rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Creates an edge handle from a raw sequence number.
    ///
    /// Only the scene should mint these.
    pub fn from_raw(sequence: u64) -> Self {
        EdgeId(sequence)
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}
