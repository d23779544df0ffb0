//! CLI module for the storesync tool.
//!
//! This module provides the command-line interface for comparing a local
//! configuration file against a live commerce platform.

mod commands;
mod output;

pub use commands::{Cli, Commands, DiffArgs, OutputFormat};
pub use output::OutputFormatter;
