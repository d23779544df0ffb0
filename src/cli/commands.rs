//! CLI command definitions.
//!
//! This module defines all CLI commands and their arguments using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::diff::ConfigurationSection;

/// Storesync - Declarative configuration diffing for commerce platforms.
#[derive(Parser, Debug)]
#[command(name = "storesync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the desired configuration file.
    #[arg(short, long, global = true, env = "STORESYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Output format (text, summary, json, markdown).
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what must change on the remote platform to match the file.
    Diff(DiffArgs),

    /// Show what must change in the file to match the remote platform.
    Introspect(DiffArgs),
}

/// Arguments shared by `diff` and `introspect`.
#[derive(Args, Debug, Clone, Default)]
pub struct DiffArgs {
    /// Only compare these sections (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub include: Vec<ConfigurationSection>,

    /// Skip these sections (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub exclude: Vec<ConfigurationSection>,

    /// Remote platform endpoint (falls back to `STORESYNC_URL`).
    #[arg(long)]
    pub url: Option<String>,

    /// Remote platform token (falls back to `STORESYNC_TOKEN`).
    #[arg(long)]
    pub token: Option<String>,

    /// Compare against an exported snapshot file instead of the platform.
    #[arg(long, conflicts_with_all = ["url", "token"])]
    pub observed: Option<PathBuf>,

    /// Maximum number of comparators running at once.
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Remote retrieval timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Exit with status 2 when changes are found.
    #[arg(long)]
    pub fail_on_changes: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Detailed human-readable output.
    #[default]
    Text,
    /// One-line summary.
    Summary,
    /// JSON output for scripting.
    Json,
    /// Markdown suitable for a review comment.
    Markdown,
}
