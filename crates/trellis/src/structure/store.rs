//! The graph store: structural records for tracked nodes.
//!
//! One [`GraphRecord`] per tracked box holds its parent, insertion-ordered
//! children, and the handles of its incident edges. The store holds
//! non-owning handles into the document arena and the scene; it never
//! touches geometry.
//!
//! A node has at most one parent. This is structural: a record stores
//! `Option<NodeId>`, and connecting a child that already has a different
//! parent panics, because the builder never legitimately produces shared
//! substructure.

use std::collections::HashMap;

use indexmap::IndexSet;
use log::trace;

use trellis_core::identifier::{EdgeId, NodeId};

/// Structural record for one tracked node.
#[derive(Debug, Default, Clone)]
pub struct GraphRecord {
    parent: Option<NodeId>,
    children: IndexSet<NodeId>,
    from_edges: IndexSet<EdgeId>,
    to_edges: IndexSet<EdgeId>,
}

impl GraphRecord {
    /// Returns the parent handle, if any.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the children in insertion order.
    pub fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.children.iter().copied()
    }

    /// Returns the number of children.
    pub fn children_count(&self) -> usize {
        self.children.len()
    }

    /// Returns the edges whose source endpoint is this node.
    pub fn from_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.from_edges.iter().copied()
    }

    /// Returns the edges whose target endpoint is this node.
    pub fn to_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.to_edges.iter().copied()
    }
}

/// Mapping from node handles to their structural records.
///
/// Owned by the session; explicitly passed to the builder, layout, and edit
/// operations rather than living in module state, so independent
/// visualizations can coexist.
#[derive(Debug, Default)]
pub struct GraphStore {
    records: HashMap<NodeId, GraphRecord>,
}

impl GraphStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of tracked nodes.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no node is tracked.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns true if `node` is tracked.
    pub fn contains(&self, node: NodeId) -> bool {
        self.records.contains_key(&node)
    }

    /// Idempotently creates an empty record for `node`.
    pub fn ensure_tracked(&mut self, node: NodeId) {
        self.records.entry(node).or_default();
    }

    /// Returns the record for `node`.
    ///
    /// # Panics
    /// Panics if `node` is untracked. Operating on an untracked node where
    /// tracking is assumed means the graph and document have desynchronized.
    pub fn record(&self, node: NodeId) -> &GraphRecord {
        self.records
            .get(&node)
            .unwrap_or_else(|| panic!("node {node} is not tracked in the graph store"))
    }

    /// Returns the record for `node`, or `None` if untracked.
    pub fn try_record(&self, node: NodeId) -> Option<&GraphRecord> {
        self.records.get(&node)
    }

    fn record_mut(&mut self, node: NodeId) -> &mut GraphRecord {
        self.records
            .get_mut(&node)
            .unwrap_or_else(|| panic!("node {node} is not tracked in the graph store"))
    }

    /// Records a parent/child relationship carried by `edge`.
    ///
    /// Ensures both endpoints are tracked, then adds `child` to the parent's
    /// children, sets the child's parent, and records the edge handle in
    /// `parent.from_edges` and `child.to_edges`. Store-only side effects.
    ///
    /// # Panics
    /// Panics if `child` already has a different parent.
    pub fn add_edge(&mut self, parent: NodeId, child: NodeId, edge: EdgeId) {
        self.ensure_tracked(parent);
        self.ensure_tracked(child);

        let child_record = self.record_mut(child);
        match child_record.parent {
            None => child_record.parent = Some(parent),
            Some(existing) if existing == parent => {}
            Some(existing) => {
                panic!("node {child} already has parent {existing}, cannot attach to {parent}")
            }
        }
        child_record.to_edges.insert(edge);

        let parent_record = self.record_mut(parent);
        parent_record.children.insert(child);
        parent_record.from_edges.insert(edge);

        trace!(parent:% = parent, child:% = child, edge:% = edge; "edge tracked");
    }

    /// Removes `edge`'s handle from both endpoint records, clearing the
    /// parent/child link it carried when it was the last edge between them.
    pub fn disconnect_edge(&mut self, source: NodeId, target: NodeId, edge: EdgeId) {
        if let Some(record) = self.records.get_mut(&source) {
            record.from_edges.shift_remove(&edge);
        }
        if let Some(record) = self.records.get_mut(&target) {
            record.to_edges.shift_remove(&edge);
            if record.parent == Some(source) {
                record.parent = None;
            }
        }
        if let Some(record) = self.records.get_mut(&source) {
            record.children.shift_remove(&target);
        }
    }

    /// Deletes the record for `node`, returning it.
    ///
    /// The caller detaches edges and children first; this only drops the
    /// bookkeeping entry.
    pub fn remove(&mut self, node: NodeId) -> Option<GraphRecord> {
        self.records.remove(&node)
    }

    /// Returns tracked nodes with no parent.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.records
            .iter()
            .filter(|(_, record)| record.parent.is_none())
            .map(|(&node, _)| node)
    }

    /// Returns all tracked node handles.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.records.keys().copied()
    }

    /// Returns `node` and all its graph descendants in preorder.
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut acc = vec![node];
        let mut cursor = 0;
        while cursor < acc.len() {
            let current = acc[cursor];
            cursor += 1;
            if let Some(record) = self.records.get(&current) {
                acc.extend(record.children());
            }
        }
        acc
    }
}

#[cfg(test)]
mod tests {
    use trellis_core::identifier::{EdgeId, NodeId};

    use super::*;

    fn n(raw: u32) -> NodeId {
        NodeId::from_raw(raw)
    }

    fn e(raw: u64) -> EdgeId {
        EdgeId::from_raw(raw)
    }

    #[test]
    fn test_ensure_tracked_is_idempotent() {
        let mut store = GraphStore::new();

        store.ensure_tracked(n(1));
        store.ensure_tracked(n(1));

        assert_eq!(store.len(), 1);
        assert!(store.contains(n(1)));
        assert_eq!(store.record(n(1)).children_count(), 0);
    }

    #[test]
    fn test_add_edge_tracks_both_endpoints() {
        let mut store = GraphStore::new();

        store.add_edge(n(1), n(2), e(10));

        assert_eq!(store.len(), 2);
        assert_eq!(store.record(n(2)).parent(), Some(n(1)));
        assert_eq!(store.record(n(1)).children().collect::<Vec<_>>(), [n(2)]);
        assert_eq!(store.record(n(1)).from_edges().collect::<Vec<_>>(), [e(10)]);
        assert_eq!(store.record(n(2)).to_edges().collect::<Vec<_>>(), [e(10)]);
    }

    #[test]
    fn test_children_keep_insertion_order() {
        let mut store = GraphStore::new();

        store.add_edge(n(1), n(5), e(1));
        store.add_edge(n(1), n(3), e(2));
        store.add_edge(n(1), n(4), e(3));

        assert_eq!(
            store.record(n(1)).children().collect::<Vec<_>>(),
            [n(5), n(3), n(4)]
        );
    }

    #[test]
    #[should_panic(expected = "already has parent")]
    fn test_second_parent_panics() {
        let mut store = GraphStore::new();

        store.add_edge(n(1), n(3), e(1));
        store.add_edge(n(2), n(3), e(2));
    }

    #[test]
    #[should_panic(expected = "is not tracked")]
    fn test_record_panics_on_untracked() {
        let store = GraphStore::new();
        store.record(n(9));
    }

    #[test]
    fn test_disconnect_edge_clears_link() {
        let mut store = GraphStore::new();
        store.add_edge(n(1), n(2), e(10));

        store.disconnect_edge(n(1), n(2), e(10));

        assert_eq!(store.record(n(1)).from_edges().count(), 0);
        assert_eq!(store.record(n(1)).children_count(), 0);
        assert_eq!(store.record(n(2)).parent(), None);
        assert_eq!(store.record(n(2)).to_edges().count(), 0);
    }

    #[test]
    fn test_roots() {
        let mut store = GraphStore::new();
        store.add_edge(n(1), n(2), e(1));
        store.add_edge(n(2), n(3), e(2));
        store.ensure_tracked(n(7));

        let mut roots: Vec<_> = store.roots().collect();
        roots.sort();
        assert_eq!(roots, [n(1), n(7)]);
    }

    #[test]
    fn test_descendants() {
        let mut store = GraphStore::new();
        store.add_edge(n(1), n(2), e(1));
        store.add_edge(n(1), n(3), e(2));
        store.add_edge(n(3), n(4), e(3));

        let descendants = store.descendants(n(1));
        assert_eq!(descendants.len(), 4);
        assert!(descendants.contains(&n(4)));

        assert_eq!(store.descendants(n(4)), [n(4)]);
    }

    #[test]
    fn test_remove_leaves_rest_untouched() {
        let mut store = GraphStore::new();
        store.add_edge(n(1), n(2), e(1));

        assert!(store.remove(n(2)).is_some());
        assert!(store.remove(n(2)).is_none());
        assert!(store.contains(n(1)));
    }
}
