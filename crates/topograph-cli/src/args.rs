//! Command-line argument definitions for the Topograph CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments only configure the rendering collaborator:
//! output path and format, configuration file selection, and logging
//! verbosity.

use std::str::FromStr;

use clap::Parser;

use topograph::config::OutputFormat;

/// Render the reference AWS EKS architecture diagram
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the output artifact (defaults to a name derived from the diagram title)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format (png, svg, dot, json-tree, json-edges), overriding the configuration
    #[arg(short, long, value_parser = OutputFormat::from_str)]
    pub format: Option<OutputFormat>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
