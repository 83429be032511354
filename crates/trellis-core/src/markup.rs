//! The markup element tree and node-kind classification.
//!
//! The learn oracle hands the engine a markup string; the parser turns it
//! into this tree, and the document arena instantiates it. Elements are
//! classified by their class list:
//!
//! - `box`: a leaf value, the only element kind that participates in the
//!   derived graph. An additional `unlearned` class marks a box that can
//!   still be expanded through the oracle.
//! - `union`: a choice among alternative subtrees; exactly one survives
//!   after the user selects.
//! - `join`: a composite of subtrees, all of which persist.
//!
//! Structural convention the graph builder depends on: a grouping element's
//! first child is its representative anchor box, and the remaining
//! alternatives live under a wrapper element. Every box is therefore at
//! least two levels below the group that owns it, which is what makes the
//! grandparent-and-up ancestor walk in the builder well defined.

use serde::{Deserialize, Serialize};

/// Class marker for leaf boxes.
pub const CLASS_BOX: &str = "box";
/// Class marker for choice groups.
pub const CLASS_UNION: &str = "union";
/// Class marker for composite groups.
pub const CLASS_JOIN: &str = "join";
/// Class marker for a box that has not been expanded yet.
pub const CLASS_UNLEARNED: &str = "unlearned";

/// Structural role of a markup element, derived from its class list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A leaf value element.
    Box,
    /// A choice among alternative subtrees.
    Union,
    /// A composite of subtrees.
    Join,
    /// Anything else: wrappers, labels, decorations. Invisible to the graph.
    Other,
}

impl NodeKind {
    /// Classifies an element by its class list.
    ///
    /// `box` wins over the group markers if an element carries several, so a
    /// malformed `class="box union"` element degrades to a plain box rather
    /// than a group with no anchor.
    pub fn classify<S: AsRef<str>>(classes: &[S]) -> Self {
        let has = |marker: &str| classes.iter().any(|c| c.as_ref() == marker);

        if has(CLASS_BOX) {
            NodeKind::Box
        } else if has(CLASS_UNION) {
            NodeKind::Union
        } else if has(CLASS_JOIN) {
            NodeKind::Join
        } else {
            NodeKind::Other
        }
    }

    /// Returns true for the grouping kinds (`union` and `join`).
    pub fn is_group(self) -> bool {
        matches!(self, NodeKind::Union | NodeKind::Join)
    }
}

/// A parsed markup element: tag, class list, direct text content, and
/// ordered child elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Markup {
    tag: String,
    classes: Vec<String>,
    text: String,
    children: Vec<Markup>,
}

impl Markup {
    /// Creates an element with the given tag and no classes, text or children.
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            classes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Adds a class to the element (builder style).
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Sets the element's direct text content (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child element (builder style).
    pub fn with_child(mut self, child: Markup) -> Self {
        self.children.push(child);
        self
    }

    /// Appends direct text content, separating runs with a single space.
    pub fn push_text(&mut self, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(trimmed);
    }

    /// Appends a child element.
    pub fn push_child(&mut self, child: Markup) {
        self.children.push(child);
    }

    /// Returns the element's tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the element's class list.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Returns the element's direct text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns the element's child elements in document order.
    pub fn children(&self) -> &[Markup] {
        &self.children
    }

    /// Returns the structural role of this element.
    pub fn kind(&self) -> NodeKind {
        NodeKind::classify(&self.classes)
    }

    /// Returns true if the element carries the `unlearned` marker.
    pub fn is_unlearned(&self) -> bool {
        self.classes.iter().any(|c| c == CLASS_UNLEARNED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(NodeKind::classify(&["box"]), NodeKind::Box);
        assert_eq!(NodeKind::classify(&["union"]), NodeKind::Union);
        assert_eq!(NodeKind::classify(&["join"]), NodeKind::Join);
        assert_eq!(NodeKind::classify(&["alts"]), NodeKind::Other);
        assert_eq!(NodeKind::classify::<&str>(&[]), NodeKind::Other);

        // box wins over group markers
        assert_eq!(NodeKind::classify(&["box", "union"]), NodeKind::Box);
        // unlearned is orthogonal to the kind
        assert_eq!(NodeKind::classify(&["box", "unlearned"]), NodeKind::Box);
    }

    #[test]
    fn test_is_group() {
        assert!(NodeKind::Union.is_group());
        assert!(NodeKind::Join.is_group());
        assert!(!NodeKind::Box.is_group());
        assert!(!NodeKind::Other.is_group());
    }

    #[test]
    fn test_builder() {
        let markup = Markup::element("div")
            .with_class("union")
            .with_child(Markup::element("div").with_class("box").with_text("concat"))
            .with_child(Markup::element("div").with_class("alts"));

        assert_eq!(markup.kind(), NodeKind::Union);
        assert_eq!(markup.children().len(), 2);
        assert_eq!(markup.children()[0].text(), "concat");
        assert_eq!(markup.children()[0].kind(), NodeKind::Box);
    }

    #[test]
    fn test_push_text_normalizes_runs() {
        let mut markup = Markup::element("div");
        markup.push_text("  hello ");
        markup.push_text("\n  ");
        markup.push_text("world");

        assert_eq!(markup.text(), "hello world");
    }

    #[test]
    fn test_unlearned_marker() {
        let markup = Markup::element("div")
            .with_class("box")
            .with_class("unlearned");

        assert_eq!(markup.kind(), NodeKind::Box);
        assert!(markup.is_unlearned());
    }
}
