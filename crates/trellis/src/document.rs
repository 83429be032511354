//! The document arena: the instantiated element tree behind the scene.
//!
//! Markup is instantiated into an arena of [`DocNode`] records addressed by
//! stable [`NodeId`] handles. The arena owns the visual tree (parent and
//! ordered children per node); the graph store holds non-owning handles into
//! it. A freed slot is never reused within one document's lifetime, so a
//! stale handle resolves to `None` instead of aliasing an unrelated node.
//!
//! Only `Box` nodes have a measured footprint; grouping and wrapper elements
//! are invisible to geometry and exist solely so the builder can discover
//! the structure.

use log::trace;

use trellis_core::geometry::Size;
use trellis_core::identifier::NodeId;
use trellis_core::markup::{Markup, NodeKind};

use crate::config::StyleConfig;

/// One element of the instantiated tree.
#[derive(Debug, Clone)]
pub struct DocNode {
    tag: String,
    classes: Vec<String>,
    text: String,
    kind: NodeKind,
    unlearned: bool,
    selectable: bool,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    size: Size,
}

impl DocNode {
    /// Returns the element tag.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the class list.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns the label text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the structural role.
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Returns true if this node still awaits oracle expansion.
    pub fn is_unlearned(&self) -> bool {
        self.unlearned
    }

    /// Returns true if this node carries a select affordance.
    pub fn is_selectable(&self) -> bool {
        self.selectable
    }

    /// Returns the parent handle, if attached.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Returns the ordered child handles.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Returns the measured footprint. Zero for non-box elements.
    pub fn size(&self) -> Size {
        self.size
    }
}

/// Arena of document nodes with a designated root.
#[derive(Debug, Default)]
pub struct Document {
    slots: Vec<Option<DocNode>>,
    root: Option<NodeId>,
}

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the document root, if one has been set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Designates `id` as the document root.
    pub fn set_root(&mut self, id: NodeId) {
        self.root = Some(id);
    }

    /// Returns the number of live nodes.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Returns true if the document has no live nodes.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_none())
    }

    /// Returns the node for the given handle, if it is still live.
    pub fn node(&self, id: NodeId) -> Option<&DocNode> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Returns the node for the given handle without checking liveness.
    ///
    /// # Panics
    /// Panics if the handle does not name a live node. Holding a stale
    /// handle here means the graph and document have desynchronized.
    pub fn node_unchecked(&self, id: NodeId) -> &DocNode {
        self.node(id)
            .unwrap_or_else(|| panic!("node {id} is not in the document"))
    }

    fn node_mut(&mut self, id: NodeId) -> &mut DocNode {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .unwrap_or_else(|| panic!("node {id} is not in the document"))
    }

    /// Instantiates a markup tree into the arena, returning the handle of
    /// its detached root element.
    ///
    /// Boxes are measured from their label via `style`; other elements get a
    /// zero footprint.
    pub fn instantiate(&mut self, markup: &Markup, style: &StyleConfig) -> NodeId {
        let id = self.instantiate_inner(markup, style, None);
        trace!(root:% = id, nodes = self.len(); "instantiated markup subtree");
        id
    }

    fn instantiate_inner(
        &mut self,
        markup: &Markup,
        style: &StyleConfig,
        parent: Option<NodeId>,
    ) -> NodeId {
        let kind = markup.kind();
        let size = if kind == NodeKind::Box {
            style.measure_box(markup.text())
        } else {
            Size::default()
        };

        let id = self.alloc(DocNode {
            tag: markup.tag().to_string(),
            classes: markup.classes().to_vec(),
            text: markup.text().to_string(),
            kind,
            unlearned: markup.is_unlearned(),
            selectable: false,
            parent,
            children: Vec::new(),
            size,
        });

        for child in markup.children() {
            let child_id = self.instantiate_inner(child, style, Some(id));
            self.node_mut(id).children.push(child_id);
        }
        id
    }

    fn alloc(&mut self, node: DocNode) -> NodeId {
        let id = NodeId::from_raw(self.slots.len() as u32);
        self.slots.push(Some(node));
        id
    }

    /// Returns the index of `child` within `parent`'s child list.
    pub fn child_index(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.node_unchecked(parent)
            .children
            .iter()
            .position(|&c| c == child)
    }

    /// Detaches `id` from its parent, returning the former parent and the
    /// index the node occupied. Detaching the root returns `None`.
    pub fn detach(&mut self, id: NodeId) -> Option<(NodeId, usize)> {
        let parent = self.node_unchecked(id).parent?;
        let index = self
            .child_index(parent, id)
            .unwrap_or_else(|| panic!("node {id} is missing from its parent's child list"));

        self.node_mut(parent).children.remove(index);
        self.node_mut(id).parent = None;
        Some((parent, index))
    }

    /// Attaches a detached node under `parent` at the given child index.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        debug_assert!(self.node_unchecked(child).parent.is_none());
        self.node_mut(parent).children.insert(index, child);
        self.node_mut(child).parent = Some(parent);
    }

    /// Frees `id` and every descendant, returning the freed handles in
    /// document order. The node must be detached (or the root) first.
    pub fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        let removed = self.descendants(id);
        for &node in &removed {
            self.slots[node.index()] = None;
        }
        if self.root == Some(id) {
            self.root = None;
        }
        trace!(root:% = id, removed = removed.len(); "removed document subtree");
        removed
    }

    /// Returns `id` and all its descendants in document (preorder) order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut acc = Vec::new();
        self.collect(id, &mut acc);
        acc
    }

    fn collect(&self, id: NodeId, acc: &mut Vec<NodeId>) {
        acc.push(id);
        for &child in &self.node_unchecked(id).children {
            self.collect(child, acc);
        }
    }

    /// Returns all `Box` descendants of `id` (including `id` itself) in
    /// document order.
    pub fn boxes_in(&self, id: NodeId) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| self.node_unchecked(n).kind == NodeKind::Box)
            .collect()
    }

    /// Returns the first `Box` in document order within the subtree at `id`.
    pub fn first_box(&self, id: NodeId) -> Option<NodeId> {
        self.boxes_in(id).into_iter().next()
    }

    /// Finds the `Union`/`Join` element owning `box_id`.
    ///
    /// Walks the parent chain starting at the box's grandparent, so a box
    /// never resolves to its own group; the first group ancestor wins. The
    /// walk never leaves the subtree rooted at `boundary`.
    pub fn enclosing_group(&self, box_id: NodeId, boundary: NodeId) -> Option<NodeId> {
        if box_id == boundary {
            return None;
        }
        let parent = self.node_unchecked(box_id).parent?;
        if parent == boundary {
            return None;
        }

        let mut current = self.node_unchecked(parent).parent?;
        loop {
            let node = self.node_unchecked(current);
            if node.kind.is_group() {
                return Some(current);
            }
            if current == boundary {
                return None;
            }
            current = node.parent?;
        }
    }

    /// Finds the anchor box of the group enclosing `box_id`: the group's
    /// first box in document order (its representative).
    pub fn enclosing_group_anchor(&self, box_id: NodeId, boundary: NodeId) -> Option<NodeId> {
        let group = self.enclosing_group(box_id, boundary)?;
        let anchor = self.first_box(group)?;
        // A group whose first box is the probe itself cannot anchor it.
        (anchor != box_id).then_some(anchor)
    }

    /// Overrides a node's measured footprint.
    ///
    /// Embedders that render with a real font stack can feed the actual
    /// on-screen measurements back in place of the headless metric.
    pub fn set_measured_size(&mut self, id: NodeId, size: Size) {
        self.node_mut(id).size = size;
    }

    /// Sets or clears the select affordance on a box, growing or shrinking
    /// its footprint by `affordance_height`.
    pub fn set_selectable(&mut self, id: NodeId, on: bool, affordance_height: f32) {
        let node = self.node_mut(id);
        if node.selectable == on {
            return;
        }
        node.selectable = on;
        let delta = if on {
            affordance_height
        } else {
            -affordance_height
        };
        node.size = Size::new(node.size.width(), node.size.height() + delta);
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use trellis_core::markup::Markup;

    use super::*;

    fn union_of_two() -> Markup {
        Markup::element("div")
            .with_class("union")
            .with_child(Markup::element("div").with_class("box").with_text("root"))
            .with_child(
                Markup::element("div")
                    .with_class("alts")
                    .with_child(Markup::element("div").with_class("box").with_text("left"))
                    .with_child(
                        Markup::element("div")
                            .with_class("box")
                            .with_class("unlearned")
                            .with_text("right"),
                    ),
            )
    }

    #[test]
    fn test_instantiate_preserves_structure() {
        let mut doc = Document::new();
        let root = doc.instantiate(&union_of_two(), &StyleConfig::default());

        assert_eq!(doc.len(), 5);
        assert_eq!(doc.node_unchecked(root).kind(), NodeKind::Union);
        assert_eq!(doc.node_unchecked(root).children().len(), 2);

        let boxes = doc.boxes_in(root);
        assert_eq!(boxes.len(), 3);
        assert_eq!(doc.node_unchecked(boxes[0]).text(), "root");
        assert_eq!(doc.node_unchecked(boxes[2]).text(), "right");
        assert!(doc.node_unchecked(boxes[2]).is_unlearned());
    }

    #[test]
    fn test_only_boxes_are_measured() {
        let mut doc = Document::new();
        let root = doc.instantiate(&union_of_two(), &StyleConfig::default());

        assert!(doc.node_unchecked(root).size().is_zero());
        let first = doc.first_box(root).unwrap();
        assert!(doc.node_unchecked(first).size().width() > 0.0);
    }

    #[test]
    fn test_enclosing_group_anchor() {
        let mut doc = Document::new();
        let root = doc.instantiate(&union_of_two(), &StyleConfig::default());
        let boxes = doc.boxes_in(root);
        let (anchor, left, right) = (boxes[0], boxes[1], boxes[2]);

        // Alternatives resolve to the union's anchor box.
        assert_eq!(doc.enclosing_group_anchor(left, root), Some(anchor));
        assert_eq!(doc.enclosing_group_anchor(right, root), Some(anchor));
        // The anchor's own walk starts above the union and finds nothing.
        assert_eq!(doc.enclosing_group_anchor(anchor, root), None);
    }

    #[test]
    fn test_enclosing_group_anchor_nested() {
        // A union nested as an alternative of an outer union.
        let markup = Markup::element("div")
            .with_class("union")
            .with_child(Markup::element("div").with_class("box").with_text("outer"))
            .with_child(Markup::element("div").with_class("alts").with_child(
                union_of_two(),
            ));

        let mut doc = Document::new();
        let root = doc.instantiate(&markup, &StyleConfig::default());
        let boxes = doc.boxes_in(root);
        // outer, root, left, right in document order
        assert_eq!(boxes.len(), 4);

        // The inner union's anchor connects upward to the outer anchor.
        assert_eq!(doc.enclosing_group_anchor(boxes[1], root), Some(boxes[0]));
        // The inner alternatives connect to the inner anchor.
        assert_eq!(doc.enclosing_group_anchor(boxes[2], root), Some(boxes[1]));
        assert_eq!(doc.enclosing_group_anchor(boxes[3], root), Some(boxes[1]));
    }

    #[test]
    fn test_anchor_walk_respects_boundary() {
        let markup = Markup::element("div")
            .with_class("union")
            .with_child(Markup::element("div").with_class("box").with_text("outer"))
            .with_child(Markup::element("div").with_class("alts").with_child(
                union_of_two(),
            ));

        let mut doc = Document::new();
        let root = doc.instantiate(&markup, &StyleConfig::default());
        let boxes = doc.boxes_in(root);
        let inner_union = doc.node_unchecked(boxes[1]).parent().unwrap();

        // Bounded at the inner union, its anchor has no parent to find.
        assert_eq!(doc.enclosing_group_anchor(boxes[1], inner_union), None);
        // Alternatives still resolve inside the boundary.
        assert_eq!(
            doc.enclosing_group_anchor(boxes[2], inner_union),
            Some(boxes[1])
        );
    }

    #[test]
    fn test_detach_and_insert() {
        let mut doc = Document::new();
        let root = doc.instantiate(&union_of_two(), &StyleConfig::default());
        let alts = doc.node_unchecked(root).children()[1];
        let left = doc.node_unchecked(alts).children()[0];

        let (parent, index) = doc.detach(left).unwrap();
        assert_eq!(parent, alts);
        assert_eq!(index, 0);
        assert_eq!(doc.node_unchecked(alts).children().len(), 1);
        assert_eq!(doc.node_unchecked(left).parent(), None);

        let right = doc.node_unchecked(alts).children()[0];
        doc.insert_child(alts, 1, left);
        assert_eq!(doc.node_unchecked(alts).children(), &[right, left]);
    }

    #[test]
    fn test_remove_subtree_frees_slots() {
        let mut doc = Document::new();
        let root = doc.instantiate(&union_of_two(), &StyleConfig::default());
        let alts = doc.node_unchecked(root).children()[1];

        doc.detach(alts);
        let removed = doc.remove_subtree(alts);

        assert_eq!(removed.len(), 3);
        assert_eq!(doc.len(), 2);
        assert!(doc.node(alts).is_none());

        // Freed slots are not reused by later allocations.
        let fresh = doc.instantiate(
            &Markup::element("div").with_class("box").with_text("new"),
            &StyleConfig::default(),
        );
        assert!(fresh.index() >= 5);
        assert!(doc.node(alts).is_none());
    }

    #[test]
    fn test_set_selectable_adjusts_height() {
        let mut doc = Document::new();
        let root = doc.instantiate(&union_of_two(), &StyleConfig::default());
        let first = doc.first_box(root).unwrap();
        let base = doc.node_unchecked(first).size().height();

        doc.set_selectable(first, true, 18.0);
        assert!(doc.node_unchecked(first).is_selectable());
        assert_approx_eq!(f32, doc.node_unchecked(first).size().height(), base + 18.0);

        // Idempotent in both directions.
        doc.set_selectable(first, true, 18.0);
        assert_approx_eq!(f32, doc.node_unchecked(first).size().height(), base + 18.0);

        doc.set_selectable(first, false, 18.0);
        assert_approx_eq!(f32, doc.node_unchecked(first).size().height(), base);
    }

    #[test]
    #[should_panic(expected = "not in the document")]
    fn test_node_unchecked_panics_on_stale_handle() {
        let mut doc = Document::new();
        let root = doc.instantiate(
            &Markup::element("div").with_class("box").with_text("x"),
            &StyleConfig::default(),
        );
        doc.remove_subtree(root);
        doc.node_unchecked(root);
    }
}
