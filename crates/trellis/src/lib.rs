//! Trellis - a graph-maintenance and layout engine for interactive
//! expression-tree visualizations.
//!
//! A tree of "boxes" nested under "union"/"join" grouping elements is
//! instantiated from markup, its parent/child graph derived from the
//! nesting, and its nodes positioned so sibling subtrees never overlap.
//! Leaves can be expanded through an external learn oracle and unions
//! collapsed onto one alternative, with the graph, the document, and the
//! rendered edges kept consistent through every edit.
//!
//! The entry point is the [`Explorer`] session:
//!
//! ```rust
//! use trellis::{Explorer, config::AppConfig};
//!
//! let source = r#"
//!     <div class="union">
//!         <div class="box">concat</div>
//!         <div class="alts">
//!             <div class="box unlearned">input</div>
//!             <div class="box unlearned">const</div>
//!         </div>
//!     </div>"#;
//!
//! let mut explorer = Explorer::new(AppConfig::default());
//! let entry = explorer.load(source).expect("markup loads");
//! assert_eq!(explorer.store().record(entry).children_count(), 2);
//!
//! let svg = explorer.export_svg();
//! assert!(svg.contains("<svg"));
//! ```

pub mod config;
pub mod document;
pub mod edit;
pub mod export;
pub mod layout;
pub mod oracle;
pub mod scene;
pub mod structure;

mod error;
mod session;

pub use trellis_core::{geometry, identifier, markup, measure};

pub use error::TrellisError;
pub use session::Explorer;
