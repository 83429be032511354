//! Structural edit operations: subtree replacement and union collapse.
//!
//! Both operations keep the document, store, and scene congruent: whatever
//! disappears from one disappears from all three, and whatever is spliced
//! in ends up tracked and laid out before the operation returns.

use log::{debug, info};

use trellis_core::identifier::NodeId;
use trellis_core::markup::{Markup, NodeKind};

use crate::config::AppConfig;
use crate::document::Document;
use crate::error::TrellisError;
use crate::layout::Layout;
use crate::scene::Scene;
use crate::structure::{self, GraphStore};

/// Replaces the document subtree at `old_root` with freshly parsed markup.
///
/// `old_root` is a document element: the box being expanded, or its
/// dedicated wrapper (which may itself be untracked). All validation runs
/// before the first destructive step, so a rejected replacement leaves the
/// prior state fully intact. On success the new subtree is tracked, wired
/// to the old subtree's structural parent, and laid out at the position the
/// old entry box occupied; no handle into the old subtree remains anywhere.
///
/// Returns the entry box of the new subtree.
pub fn replace_subtree(
    document: &mut Document,
    store: &mut GraphStore,
    scene: &mut Scene,
    layout: &mut Layout,
    config: &AppConfig,
    old_root: NodeId,
    replacement: &Markup,
) -> Result<NodeId, TrellisError> {
    if replacement.kind() == NodeKind::Other {
        return Err(TrellisError::Edit(
            "replacement markup has no recognizable root element".into(),
        ));
    }
    if !markup_has_box(replacement) {
        return Err(TrellisError::Edit(
            "replacement markup contains no box".into(),
        ));
    }

    let old_entry = document
        .first_box(old_root)
        .ok_or_else(|| TrellisError::Edit(format!("subtree {old_root} contains no box")))?;
    let anchor = layout.position(old_entry).unwrap_or_default();
    let graph_parent = store.try_record(old_entry).and_then(|r| r.parent());
    info!(
        old_root:% = old_root,
        entry:% = old_entry,
        x = anchor.x(),
        y = anchor.y();
        "replacing subtree"
    );

    // Destructive phase. Scrub the old boxes from scene and store, then
    // splice the document.
    scrub_boxes(document, store, scene, layout, old_root);
    let splice_point = document.detach(old_root);
    document.remove_subtree(old_root);

    let new_root = document.instantiate(replacement, config.style());
    match splice_point {
        Some((container, index)) => document.insert_child(container, index, new_root),
        None => document.set_root(new_root),
    }

    structure::build(document, store, scene, layout, config.style(), new_root);
    let entry = document
        .first_box(new_root)
        .expect("validated replacement markup contains a box");

    if let Some(parent) = graph_parent.filter(|&p| store.contains(p)) {
        // A subtree spliced in as a union alternative stays selectable.
        let owning_union = document
            .root()
            .and_then(|root| document.enclosing_group(entry, root))
            .filter(|&g| document.node_unchecked(g).kind() == NodeKind::Union);
        if owning_union.is_some() {
            document.set_selectable(entry, true, config.style().affordance_height());
        }

        let edge = scene.connect(
            parent,
            layout.rect(document, parent),
            entry,
            layout.rect(document, entry),
        );
        store.add_edge(parent, entry, edge);
    }

    layout.place(document, store, scene, entry, anchor.x(), anchor.y());
    Ok(entry)
}

/// Collapses the union owning `chosen` onto that alternative.
///
/// Removes the select affordance from `chosen`, then deletes every sibling
/// alternative's subtree from document, store, and scene. A `chosen` whose
/// parent anchor is not owned by a `Union` makes this a no-op.
///
/// # Panics
/// Panics if `chosen` is untracked.
pub fn collapse_union(
    document: &mut Document,
    store: &mut GraphStore,
    scene: &mut Scene,
    layout: &mut Layout,
    config: &AppConfig,
    chosen: NodeId,
) -> Result<(), TrellisError> {
    document.set_selectable(chosen, false, config.style().affordance_height());
    scene.sync_node(store.record(chosen), layout.rect(document, chosen));

    let Some(anchor) = store.record(chosen).parent() else {
        return Ok(());
    };
    let owning_group = document.node_unchecked(anchor).parent();
    if owning_group.is_none_or(|g| document.node_unchecked(g).kind() != NodeKind::Union) {
        debug!(chosen:% = chosen; "selection outside a union, nothing to collapse");
        return Ok(());
    }

    let siblings: Vec<NodeId> = store
        .record(anchor)
        .children()
        .filter(|&c| c != chosen)
        .collect();
    info!(chosen:% = chosen, anchor:% = anchor, siblings = siblings.len(); "collapsing union");

    for sibling in siblings {
        let element = visual_subtree_root(document, sibling);
        scrub_boxes(document, store, scene, layout, element);
        document.detach(element);
        document.remove_subtree(element);
    }

    debug_assert_eq!(store.record(anchor).children_count(), 1);
    Ok(())
}

/// Chooses the document element a box's removal should take with it.
///
/// A box that is the representative anchor of its own group drags the whole
/// group element along, so collapsing never leaves an empty group husk in
/// the document.
fn visual_subtree_root(document: &Document, box_id: NodeId) -> NodeId {
    let mut element = box_id;
    while let Some(parent) = document.node_unchecked(element).parent() {
        let node = document.node_unchecked(parent);
        if node.kind().is_group() && node.children().first() == Some(&element) {
            element = parent;
        } else {
            break;
        }
    }
    element
}

/// Removes every box under `subtree` from the store and scene.
///
/// Each box's incident segments leave the scene, their handles leave the
/// records on both endpoints, and the box's own record and position are
/// dropped. Document nodes are left for the caller to splice or free.
fn scrub_boxes(
    document: &Document,
    store: &mut GraphStore,
    scene: &mut Scene,
    layout: &mut Layout,
    subtree: NodeId,
) {
    for box_id in document.boxes_in(subtree) {
        let Some(record) = store.try_record(box_id) else {
            continue;
        };
        let edges: Vec<_> = record.from_edges().chain(record.to_edges()).collect();
        for edge in edges {
            if let Some(segment) = scene.remove(edge) {
                store.disconnect_edge(segment.source(), segment.target(), edge);
            }
        }
        store.remove(box_id);
        layout.forget(box_id);
    }
}

fn markup_has_box(markup: &Markup) -> bool {
    markup.kind() == NodeKind::Box || markup.children().iter().any(markup_has_box)
}
