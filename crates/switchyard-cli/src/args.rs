//! Command-line argument definitions for the Switchyard CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, rendering overrides, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Switchyard railroad diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input diagram description
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output SVG file
    #[arg(short, long, default_value = "out.svg")]
    pub output: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Diagram title, placed at the configured title position
    #[arg(short, long)]
    pub title: Option<String>,

    /// Scale factor for the output size, overrides the configuration
    #[arg(short, long)]
    pub scale: Option<f32>,

    /// Omit the white page background
    #[arg(long)]
    pub transparent: bool,

    /// Measure text with fixed per-character widths instead of system fonts
    #[arg(long)]
    pub estimate_text: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
