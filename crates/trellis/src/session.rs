//! The explorer session: one visualization and everything it owns.
//!
//! [`Explorer`] is the application context: it owns the document arena, the
//! graph store, the scene, and the layout engine, and exposes the
//! user-facing operations (load, learn, select, drag, pan, export). It is
//! an explicit object rather than module state, so independent
//! visualizations coexist and everything is testable headlessly.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use log::{debug, info};

use trellis_core::geometry::{Point, Rect};
use trellis_core::identifier::NodeId;
use trellis_core::markup::NodeKind;
use trellis_parser::parse_markup;

use crate::config::AppConfig;
use crate::document::Document;
use crate::edit;
use crate::error::TrellisError;
use crate::export::SvgRenderer;
use crate::layout::Layout;
use crate::oracle::LearnOracle;
use crate::scene::Scene;
use crate::structure::{self, GraphStore};

/// An interactive visualization session.
pub struct Explorer {
    config: AppConfig,
    document: Document,
    store: GraphStore,
    scene: Scene,
    layout: Layout,
    pending: HashSet<NodeId>,
    drag: Option<NodeId>,
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Explorer {
    /// Creates an empty session with the given configuration.
    pub fn new(config: AppConfig) -> Self {
        let layout = Layout::new(config.layout());
        Self {
            config,
            document: Document::new(),
            store: GraphStore::new(),
            scene: Scene::new(),
            layout,
            pending: HashSet::new(),
            drag: None,
        }
    }

    /// Loads a markup document, replacing any previous content.
    ///
    /// Parses, instantiates, derives the graph, and lays the tree out at
    /// the configured anchor. Returns the entry box.
    pub fn load(&mut self, source: &str) -> Result<NodeId, TrellisError> {
        info!("loading markup document");
        let markup = parse_markup(source)
            .map_err(|err| TrellisError::new_parse_error(err, source))?;

        self.document = Document::new();
        self.store = GraphStore::new();
        self.scene = Scene::new();
        self.layout = Layout::new(self.config.layout());
        self.pending.clear();
        self.drag = None;

        let root = self.document.instantiate(&markup, self.config.style());
        self.document.set_root(root);
        structure::build(
            &mut self.document,
            &mut self.store,
            &mut self.scene,
            &self.layout,
            self.config.style(),
            root,
        );

        let entry = self
            .document
            .first_box(root)
            .ok_or_else(|| TrellisError::Graph("document contains no box".into()))?;
        self.layout.place(
            &self.document,
            &self.store,
            &mut self.scene,
            entry,
            self.config.layout().anchor_x(),
            self.config.layout().anchor_y(),
        );
        debug!(entry:% = entry, nodes = self.store.len(); "document loaded");
        Ok(entry)
    }

    /// Expands an unlearned box through the oracle, replacing its subtree.
    ///
    /// The oracle is consulted and its markup parsed before anything is
    /// removed; a failure on either count leaves the session untouched. A
    /// second learn against a node whose replacement is already pending is
    /// rejected. Returns the entry box of the new subtree.
    pub fn learn(
        &mut self,
        node: NodeId,
        oracle: &dyn LearnOracle,
    ) -> Result<NodeId, TrellisError> {
        let doc_node = self
            .document
            .node(node)
            .ok_or_else(|| TrellisError::Edit(format!("node {node} is not in the document")))?;
        if doc_node.kind() != NodeKind::Box || !doc_node.is_unlearned() {
            return Err(TrellisError::Edit(format!(
                "node {node} is not an unlearned box"
            )));
        }
        if !self.pending.insert(node) {
            return Err(TrellisError::Edit(format!(
                "a learn is already pending for node {node}"
            )));
        }
        let goal = doc_node.text().to_string();
        info!(node:% = node, goal:% = goal; "learning");

        let source = match oracle.learn(&goal, self.config.learn_depth()) {
            Ok(source) => source,
            Err(err) => {
                self.pending.remove(&node);
                return Err(err.into());
            }
        };
        let markup = match parse_markup(&source) {
            Ok(markup) => markup,
            Err(err) => {
                self.pending.remove(&node);
                return Err(TrellisError::new_parse_error(err, source));
            }
        };

        let target = self.replace_target(node);
        let result = edit::replace_subtree(
            &mut self.document,
            &mut self.store,
            &mut self.scene,
            &mut self.layout,
            &self.config,
            target,
            &markup,
        );
        self.pending.remove(&node);
        result
    }

    /// The element a learn on `node` replaces: the node's dedicated wrapper
    /// when it has one, otherwise the node itself.
    fn replace_target(&self, node: NodeId) -> NodeId {
        match self.document.node_unchecked(node).parent() {
            Some(parent) if self.document.node_unchecked(parent).children().len() == 1 => parent,
            _ => node,
        }
    }

    /// Collapses the union owning `node` onto that alternative.
    pub fn select(&mut self, node: NodeId) -> Result<(), TrellisError> {
        edit::collapse_union(
            &mut self.document,
            &mut self.store,
            &mut self.scene,
            &mut self.layout,
            &self.config,
            node,
        )
    }

    /// Starts dragging a tracked box.
    pub fn begin_drag(&mut self, node: NodeId) {
        self.store.record(node);
        self.drag = Some(node);
    }

    /// Moves the dragged box so it is centered under the pointer.
    ///
    /// Only the box and its incident edges follow; descendants stay put.
    pub fn drag_to(&mut self, pointer: Point) {
        let Some(node) = self.drag else {
            return;
        };
        let size = self.document.node_unchecked(node).size();
        let local = pointer.sub_point(self.scene.viewport());
        let position = Point::new(
            local.x() - size.width() / 2.0,
            local.y() - size.height() / 2.0,
        );
        self.layout.move_node(
            &self.document,
            &self.store,
            &mut self.scene,
            node,
            position,
        );
    }

    /// Ends the current drag, if any.
    pub fn end_drag(&mut self) {
        self.drag = None;
    }

    /// Shifts the viewport by one step in the given direction.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let step = self.config.layout().pan_step();
        self.scene.pan(Point::new(dx * step, dy * step));
    }

    /// Renders the session to an SVG string.
    pub fn export_svg(&self) -> String {
        SvgRenderer::new(self.config.style()).render_to_string(
            &self.document,
            &self.store,
            &self.scene,
            &self.layout,
        )
    }

    /// Renders the session and writes the SVG to `path`.
    pub fn export_svg_to(&self, path: impl AsRef<Path>) -> Result<(), TrellisError> {
        let rendered = self.export_svg();
        fs::write(path, rendered)?;
        Ok(())
    }

    /// Returns the session configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Returns the document arena.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Returns the graph store.
    pub fn store(&self) -> &GraphStore {
        &self.store
    }

    /// Returns the scene.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the layout engine.
    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Returns a node's current screen rectangle.
    pub fn rect(&self, node: NodeId) -> Rect {
        self.layout.rect(&self.document, node)
    }
}
