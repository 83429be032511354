//! CLI logic for the Trellis tree visualization tool.
//!
//! Loads a markup file into a headless [`Explorer`] session, optionally
//! expands unlearned leaves through a directory-backed oracle, and writes
//! the rendered SVG.

pub mod error_adapter;
pub mod oracle;

mod args;
mod config;

pub use args::Args;

use std::fs;

use log::{info, warn};

use trellis::{Explorer, TrellisError};

use crate::oracle::DirectoryOracle;

/// Run the Trellis CLI application
///
/// Processes the input file through the Trellis pipeline and writes the
/// resulting SVG to the output file. When an oracle directory is given,
/// every unlearned leaf is expanded for the requested number of rounds
/// before export; leaves the oracle cannot answer are left unlearned.
///
/// # Errors
///
/// Returns `TrellisError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Parsing errors
/// - Graph or edit errors
pub fn run(args: &Args) -> Result<(), TrellisError> {
    info!(
        input_path = args.input,
        output_path = args.output;
        "Processing visualization"
    );

    let app_config = config::load_config(args.config.as_ref())?;
    let source = fs::read_to_string(&args.input)?;

    let mut explorer = Explorer::new(app_config);
    explorer.load(&source)?;

    if let Some(dir) = &args.oracle_dir {
        let oracle = DirectoryOracle::new(dir);
        expand_leaves(&mut explorer, &oracle, args.expand)?;
    }

    explorer.export_svg_to(&args.output)?;
    info!(output_file = args.output; "SVG exported successfully");

    Ok(())
}

/// Expands every reachable unlearned leaf for up to `rounds` rounds.
///
/// An oracle failure on one leaf is logged and skipped; the leaf is
/// remembered so later rounds do not retry it. Any other error aborts.
fn expand_leaves(
    explorer: &mut Explorer,
    oracle: &DirectoryOracle,
    rounds: usize,
) -> Result<(), TrellisError> {
    let mut unanswered = std::collections::HashSet::new();

    for round in 0..rounds {
        let leaves: Vec<_> = explorer
            .store()
            .nodes()
            .filter(|&node| {
                explorer.document().node_unchecked(node).is_unlearned()
                    && !unanswered.contains(&node)
            })
            .collect();
        if leaves.is_empty() {
            break;
        }
        info!(round, leaves = leaves.len(); "Expanding unlearned leaves");

        for leaf in leaves {
            if !explorer.store().contains(leaf) {
                continue;
            }
            match explorer.learn(leaf, oracle) {
                Ok(_) => {}
                Err(TrellisError::Oracle(err)) => {
                    warn!(leaf:% = leaf, err:% = err; "Leaf left unlearned");
                    unanswered.insert(leaf);
                }
                Err(err) => return Err(err),
            }
        }
    }
    Ok(())
}
