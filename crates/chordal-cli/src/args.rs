//! Command-line argument definitions for the Chordal CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control the model document path, output path,
//! configuration file selection, filter overrides, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Chordal extraction driver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input model document (JSON)
    #[arg(help = "Path to the model document")]
    pub input: String,

    /// Path to the output chord payload file
    #[arg(short, long, default_value = "chord.json")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Element-type filter (overrides the configuration file)
    #[arg(long)]
    pub element_type: Option<String>,

    /// Relation-kind filter (overrides the configuration file)
    #[arg(long)]
    pub relation: Option<String>,

    /// Descend into nested containers
    #[arg(long)]
    pub recursive: bool,

    /// Remove elements with no incident weight
    #[arg(long)]
    pub hide_orphans: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
