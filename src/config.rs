//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.crimetally.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input column names.
    #[serde(default)]
    pub fields: FieldsConfig,

    /// Loader settings.
    #[serde(default)]
    pub loader: LoaderConfig,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Which CSV columns carry the incident fields.
///
/// Defaults match the reference crime export; exports with renamed
/// headers can remap them here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldsConfig {
    /// Patrol shift column.
    #[serde(default = "default_shift_field")]
    pub shift: String,

    /// Offense label column.
    #[serde(default = "default_offense_field")]
    pub offense: String,

    /// Report timestamp column.
    #[serde(default = "default_report_field")]
    pub report: String,

    /// Incident start timestamp column.
    #[serde(default = "default_start_field")]
    pub start: String,

    /// Incident end timestamp column.
    #[serde(default = "default_end_field")]
    pub end: String,
}

impl Default for FieldsConfig {
    fn default() -> Self {
        Self {
            shift: default_shift_field(),
            offense: default_offense_field(),
            report: default_report_field(),
            start: default_start_field(),
            end: default_end_field(),
        }
    }
}

fn default_shift_field() -> String {
    "SHIFT".to_string()
}

fn default_offense_field() -> String {
    "OFFENSE".to_string()
}

fn default_report_field() -> String {
    "REPORT_DAT".to_string()
}

fn default_start_field() -> String {
    "START_DATE".to_string()
}

fn default_end_field() -> String {
    "END_DATE".to_string()
}

/// Loader settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Skip records missing required fields instead of failing.
    /// Skipped records are counted and reported.
    #[serde(default)]
    pub skip_malformed: bool,
}

/// Report generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format: "text" or "json".
    #[serde(default = "default_format")]
    pub format: String,

    /// Use true elapsed-time duration arithmetic instead of the
    /// legacy absolute-minute-difference formula.
    #[serde(default)]
    pub true_elapsed: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            true_elapsed: false,
        }
    }
}

fn default_format() -> String {
    "text".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(".crimetally.toml");

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        // Flags only override when set; the config file keeps its say
        // otherwise.
        if args.skip_malformed {
            self.loader.skip_malformed = true;
        }
        if args.true_elapsed {
            self.report.true_elapsed = true;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        // Format - only override if explicitly provided via CLI.
        if let Some(format) = args.format {
            self.report.format = format.as_config_str().to_string();
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
