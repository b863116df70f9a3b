//! Command-line interface for fcsettings.
//!
//! This module provides the CLI structure for the `fcdiff` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CompareCommand, ConfigCommand, DepsCommand, OutputFormatArg, ParseCommand, PidsCommand,
    UploadCommand,
};

/// fcdiff - Inspect and compare flight controller settings
///
/// Parses firmware CLI dumps, derives PID gains across firmware encodings, and
/// shows which differences between two builds are meaningful.
#[derive(Debug, Parser)]
#[command(name = "fcdiff")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse a CLI dump into raw numeric settings
    Parse(ParseCommand),

    /// Derive PID gains from a CLI dump
    Pids(PidsCommand),

    /// Compare two builds' settings
    Compare(CompareCommand),

    /// Show the field dependency table
    Deps(DepsCommand),

    /// Validate a GUI backup / CLI dump pair
    Upload(UploadCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
