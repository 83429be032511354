//! A learn oracle backed by a directory of markup files.
//!
//! Each goal resolves to one file in the directory: the goal text,
//! sanitized to a safe filename, plus an `.html` extension. A goal with no
//! file is a rejection, which the expansion loop treats as "leave this one
//! unlearned" rather than a fatal error.

use std::path::{Path, PathBuf};

use log::debug;

use trellis::oracle::{LearnOracle, OracleError};

/// Resolves goals against `<dir>/<goal>.html` files.
#[derive(Debug, Clone)]
pub struct DirectoryOracle {
    dir: PathBuf,
}

impl DirectoryOracle {
    /// Creates an oracle rooted at the given directory.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn path_for(&self, goal: &str) -> PathBuf {
        self.dir.join(format!("{}.html", sanitize(goal)))
    }
}

impl LearnOracle for DirectoryOracle {
    fn learn(&self, goal: &str, depth: usize) -> Result<String, OracleError> {
        let path = self.path_for(goal);
        debug!(goal:% = goal, depth, path = path.display().to_string(); "Resolving goal");

        if !path.exists() {
            return Err(OracleError::rejected(goal, "no markup file for goal"));
        }
        Ok(std::fs::read_to_string(path)?)
    }
}

/// Maps a goal to a filename stem: alphanumerics pass through, everything
/// else becomes an underscore.
fn sanitize(goal: &str) -> String {
    goal.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}
