//! Command-line argument definitions for the Lineage CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the type catalog, the focus types, the
//! output directory, configuration file, parallelism and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Lineage class-diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the TOML type catalog
    #[arg(help = "Path to the type catalog")]
    pub input: String,

    /// Qualified names of the types to draw; every included type if omitted
    #[arg(short, long = "focus")]
    pub focus: Vec<String>,

    /// Directory receiving one SVG file per focus type
    #[arg(short, long, default_value = "diagrams")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Number of diagrams rendered in parallel
    #[arg(short, long, default_value_t = 1)]
    pub jobs: usize,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
