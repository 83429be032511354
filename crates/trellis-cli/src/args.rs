//! Command-line argument definitions for the Trellis CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, oracle-driven expansion, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Trellis tree visualization tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input markup file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Directory holding oracle markup, one `<goal>.html` file per goal
    #[arg(long)]
    pub oracle_dir: Option<String>,

    /// Number of expansion rounds to run against the oracle directory
    #[arg(long, default_value_t = 0)]
    pub expand: usize,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
