//! Command-line argument definitions for the ucd CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, what is emitted, and logging verbosity.

use clap::{Parser, ValueEnum};

/// What the CLI writes for a successfully processed input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Emit {
    /// The parsed diagram printed back as source text
    Tree,
    /// The parsed diagram as JSON
    Json,
    /// The token stream, one token per line
    Tokens,
}

/// Command-line arguments for the ucd use case diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output file; stdout when absent
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Output kind; defaults to the configured output format
    #[arg(short, long, value_enum)]
    pub emit: Option<Emit>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}
