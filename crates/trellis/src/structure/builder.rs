//! The graph builder: derives parent/child structure from document nesting.
//!
//! Scans the `Box` descendants of a subtree in document order. A box's
//! structural parent is the anchor (representative first box) of the first
//! `Union`/`Join` ancestor above the box's own group; a box with no such
//! ancestor inside the subtree is the subtree's entry and is tracked with
//! no parent. Each discovered pair gets a scene edge, and alternatives
//! owned by a `Union` get a select affordance so the user may later
//! collapse the union onto them.
//!
//! The builder runs once at load and once per structural edit, always on a
//! freshly spliced subtree. It is idempotent per distinct subtree; invoking
//! it twice on the same region double-tracks edges, which is a caller
//! obligation, not an internal guard.

use log::debug;

use trellis_core::identifier::NodeId;
use trellis_core::markup::NodeKind;

use crate::config::StyleConfig;
use crate::document::Document;
use crate::layout::Layout;
use crate::scene::Scene;
use crate::structure::GraphStore;

/// Populates the store and scene from the document subtree at
/// `subtree_root`.
pub fn build(
    document: &mut Document,
    store: &mut GraphStore,
    scene: &mut Scene,
    layout: &Layout,
    style: &StyleConfig,
    subtree_root: NodeId,
) {
    let boxes = document.boxes_in(subtree_root);
    debug!(subtree_root:% = subtree_root, boxes = boxes.len(); "building graph from document");

    for box_id in boxes {
        let Some(group) = document.enclosing_group(box_id, subtree_root) else {
            // The subtree's entry box.
            store.ensure_tracked(box_id);
            continue;
        };
        let Some(anchor) = document.first_box(group) else {
            continue;
        };
        if anchor == box_id {
            store.ensure_tracked(box_id);
            continue;
        }

        // Affordance first so the edge is pinned to the final geometry.
        if document.node_unchecked(group).kind() == NodeKind::Union {
            document.set_selectable(box_id, true, style.affordance_height());
        }

        let edge = scene.connect(
            anchor,
            layout.rect(document, anchor),
            box_id,
            layout.rect(document, box_id),
        );
        store.add_edge(anchor, box_id, edge);
    }
}

#[cfg(test)]
mod tests {
    use trellis_parser::parse_markup;

    use crate::config::AppConfig;

    use super::*;

    fn built(source: &str) -> (Document, GraphStore, Scene, NodeId) {
        let config = AppConfig::default();
        let markup = parse_markup(source).expect("fixture markup parses");
        let mut document = Document::new();
        let root = document.instantiate(&markup, config.style());
        document.set_root(root);

        let mut store = GraphStore::new();
        let mut scene = Scene::new();
        let layout = Layout::new(config.layout());
        build(
            &mut document,
            &mut store,
            &mut scene,
            &layout,
            config.style(),
            root,
        );
        (document, store, scene, root)
    }

    const UNION_OF_TWO: &str = r#"
        <div class="union">
            <div class="box">root</div>
            <div class="alts">
                <div class="box unlearned">left</div>
                <div class="box unlearned">right</div>
            </div>
        </div>"#;

    #[test]
    fn test_union_edges_and_affordances() {
        let (document, store, scene, root) = built(UNION_OF_TWO);
        let boxes = document.boxes_in(root);
        let (anchor, left, right) = (boxes[0], boxes[1], boxes[2]);

        assert_eq!(store.len(), 3);
        assert_eq!(scene.len(), 2);
        assert_eq!(store.record(anchor).parent(), None);
        assert_eq!(
            store.record(anchor).children().collect::<Vec<_>>(),
            [left, right]
        );
        assert_eq!(store.record(left).parent(), Some(anchor));
        assert_eq!(store.record(right).parent(), Some(anchor));

        // Union alternatives carry the select affordance; the anchor does not.
        assert!(document.node_unchecked(left).is_selectable());
        assert!(document.node_unchecked(right).is_selectable());
        assert!(!document.node_unchecked(anchor).is_selectable());
    }

    #[test]
    fn test_join_children_are_not_selectable() {
        let (document, store, _scene, root) = built(
            r#"
            <div class="join">
                <div class="box">pair</div>
                <div class="parts">
                    <div class="box">first</div>
                    <div class="box">second</div>
                </div>
            </div>"#,
        );
        let boxes = document.boxes_in(root);

        assert_eq!(store.record(boxes[0]).children_count(), 2);
        assert!(!document.node_unchecked(boxes[1]).is_selectable());
        assert!(!document.node_unchecked(boxes[2]).is_selectable());
    }

    #[test]
    fn test_single_box_is_tracked_root() {
        let (document, store, scene, root) = built(r#"<div class="box unlearned">start</div>"#);
        let entry = document.first_box(root).unwrap();

        assert_eq!(store.len(), 1);
        assert!(scene.is_empty());
        assert_eq!(store.record(entry).parent(), None);
        assert_eq!(store.roots().collect::<Vec<_>>(), [entry]);
    }

    #[test]
    fn test_nested_unions_chain_through_anchors() {
        let (document, store, scene, root) = built(
            r#"
            <div class="union">
                <div class="box">outer</div>
                <div class="alts">
                    <div class="union">
                        <div class="box">inner</div>
                        <div class="alts">
                            <div class="box unlearned">leaf</div>
                        </div>
                    </div>
                </div>
            </div>"#,
        );
        let boxes = document.boxes_in(root);
        let (outer, inner, leaf) = (boxes[0], boxes[1], boxes[2]);

        assert_eq!(scene.len(), 2);
        assert_eq!(store.record(inner).parent(), Some(outer));
        assert_eq!(store.record(leaf).parent(), Some(inner));
        // The nested anchor is itself a selectable alternative of the outer
        // union.
        assert!(document.node_unchecked(inner).is_selectable());
    }

    #[test]
    fn test_edges_pinned_to_current_geometry() {
        let config = AppConfig::default();
        let (document, _store, scene, root) = built(UNION_OF_TWO);
        let layout = Layout::new(config.layout());
        let boxes = document.boxes_in(root);

        for (_, segment) in scene.segments() {
            assert_eq!(
                segment.start(),
                layout.rect(&document, segment.source()).anchor_bottom()
            );
            assert_eq!(
                segment.end(),
                layout.rect(&document, segment.target()).anchor_top()
            );
        }
        // Affordance height is part of the pinned geometry.
        assert!(document.node_unchecked(boxes[1]).is_selectable());
    }
}
