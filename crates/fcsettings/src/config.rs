//! Configuration management for fcsettings.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::tuning::DEFAULT_RATE_DIVISOR;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default config directory name.
const CONFIG_DIR_NAME: &str = "fcsettings";

/// Largest number of decimal places accepted for display precision.
const MAX_PRECISION: usize = 10;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `FCSETTINGS_`)
/// 2. TOML config file at `~/.config/fcsettings/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How values are displayed.
    pub display: DisplayConfig,
    /// Output configuration.
    pub output: OutputConfig,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Text shown for a value the dump didn't contain.
    pub unknown_placeholder: String,
    /// Decimal places for proportional gains.
    pub pid_p_precision: usize,
    /// Decimal places for integral gains.
    pub pid_i_precision: usize,
    /// Divisor applied to rate fields stored in hundredths.
    pub rate_divisor: f64,
}

/// Output-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default output format for reports.
    pub format: OutputFormat,
}

/// Output format for reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Plain text tables.
    #[default]
    Plain,
    /// JSON output.
    Json,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            unknown_placeholder: "unknown".to_string(),
            pid_p_precision: 1,
            pid_i_precision: 3,
            rate_divisor: DEFAULT_RATE_DIVISOR,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `FCSETTINGS_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed("FCSETTINGS_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(CONFIG_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        let display = &self.display;

        if display.unknown_placeholder.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "unknown_placeholder must not be empty".to_string(),
            });
        }

        if !display.rate_divisor.is_finite() || display.rate_divisor <= 0.0 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "rate_divisor must be a positive number, got {}",
                    display.rate_divisor
                ),
            });
        }

        for (name, precision) in [
            ("pid_p_precision", display.pid_p_precision),
            ("pid_i_precision", display.pid_i_precision),
        ] {
            if precision > MAX_PRECISION {
                return Err(Error::ConfigValidation {
                    message: format!("{name} ({precision}) cannot exceed {MAX_PRECISION}"),
                });
            }
        }

        Ok(())
    }
}
