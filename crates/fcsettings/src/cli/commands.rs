//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Parse command arguments.
#[derive(Debug, Args)]
pub struct ParseCommand {
    /// CLI dump to parse
    pub dump: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// PID derivation command arguments.
#[derive(Debug, Args)]
pub struct PidsCommand {
    /// CLI dump to derive PIDs from
    pub dump: PathBuf,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Compare command arguments.
#[derive(Debug, Args)]
pub struct CompareCommand {
    /// CLI dump of the primary build
    pub primary: PathBuf,

    /// CLI dump of the build to compare against
    pub secondary: Option<PathBuf>,

    /// Part selected in the primary build (e.g. fc=naze32)
    #[arg(short = 'p', long = "primary-part", value_name = "CATEGORY=PART")]
    pub primary_parts: Vec<String>,

    /// Part selected in the secondary build (e.g. receiver=x4r-sb)
    #[arg(short = 's', long = "secondary-part", value_name = "CATEGORY=PART")]
    pub secondary_parts: Vec<String>,

    /// Output format (defaults to the configured format)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormatArg>,
}

/// Dependency table command arguments.
#[derive(Debug, Args)]
pub struct DepsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Upload validation command arguments.
#[derive(Debug, Args)]
pub struct UploadCommand {
    /// Configurator GUI backup file
    #[arg(long, value_name = "FILE")]
    pub gui_backup: Option<PathBuf>,

    /// CLI dump file
    #[arg(long, value_name = "FILE")]
    pub cli_dump: Option<PathBuf>,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// Plain text tables
    Plain,
    /// JSON output
    Json,
}

impl From<OutputFormatArg> for crate::config::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Plain => Self::Plain,
            OutputFormatArg::Json => Self::Json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_format_arg_conversion() {
        assert_eq!(
            crate::config::OutputFormat::from(OutputFormatArg::Plain),
            crate::config::OutputFormat::Plain
        );
        assert_eq!(
            crate::config::OutputFormat::from(OutputFormatArg::Json),
            crate::config::OutputFormat::Json
        );
    }

    #[test]
    fn test_config_command_debug() {
        let cmd = ConfigCommand::Show { json: true };
        let debug_str = format!("{cmd:?}");
        assert!(debug_str.contains("Show"));
        assert!(debug_str.contains("json"));
    }
}
