//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// CrimeTally - crime incident CSV summarizer
///
/// Reads a crime incident CSV export and prints aggregate counts by
/// shift, report hour, and offense, plus average incident duration per
/// offense category.
///
/// Examples:
///   crimetally Crimes.csv
///   crimetally Crimes.csv --format json -o report.json
///   crimetally Crimes.csv --skip-malformed --true-elapsed
///   crimetally --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the incident CSV file
    ///
    /// Must have a header row naming at least the shift, offense, and
    /// report-timestamp columns. Not required with --init-config.
    /// Can also be set via the CRIMETALLY_INPUT env var.
    #[arg(
        value_name = "INPUT",
        env = "CRIMETALLY_INPUT",
        required_unless_present = "init_config"
    )]
    pub input: Option<PathBuf>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, json)
    ///
    /// Overrides the config file; defaults to text.
    #[arg(short, long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .crimetally.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Skip records missing required fields instead of failing
    ///
    /// Skipped records are counted and listed in the report footer.
    #[arg(long)]
    pub skip_malformed: bool,

    /// Use true elapsed-time duration arithmetic
    ///
    /// The default formula reproduces historical reports exactly,
    /// including an absolute-value minute delta that overshoots when an
    /// incident crosses an hour boundary with decreasing minutes.
    #[arg(long)]
    pub true_elapsed: bool,

    /// Dry run: load and count records without summarizing
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .crimetally.toml configuration file
    #[arg(long)]
    pub init_config: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Line-oriented text (default)
    #[default]
    Text,
    /// JSON format
    Json,
}

impl OutputFormat {
    /// The name used in the config file.
    pub fn as_config_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    /// Parse a config file format name; unknown names fall back to text.
    pub fn from_config_str(s: &str) -> Self {
        match s {
            "json" => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        // Validate input path
        match self.input {
            Some(ref input) => {
                if !input.exists() {
                    return Err(format!("Input file does not exist: {}", input.display()));
                }
                if !input.is_file() {
                    return Err(format!("Input path is not a file: {}", input.display()));
                }
            }
            None => return Err("An input CSV file is required".to_string()),
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_args() -> Args {
        Args {
            input: Some(PathBuf::from("Crimes.csv")),
            output: None,
            format: None,
            config: None,
            skip_malformed: false,
            true_elapsed: false,
            dry_run: false,
            init_config: false,
            verbose: false,
            quiet: false,
        }
    }

    #[test]
    fn test_validation_missing_input() {
        let mut args = make_args();
        args.input = None;
        assert!(args.validate().is_err());

        // --init-config needs no input
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_nonexistent_input() {
        let mut args = make_args();
        args.input = Some(PathBuf::from("/nonexistent/Crimes.csv"));
        let err = args.validate().unwrap_err();
        assert!(err.contains("does not exist"));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;

        let err = args.validate().unwrap_err();
        assert!(err.contains("--verbose and --quiet"));

        // --init-config short-circuits validation entirely
        args.init_config = true;
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }

    #[test]
    fn test_output_format_config_round_trip() {
        assert_eq!(OutputFormat::from_config_str("json"), OutputFormat::Json);
        assert_eq!(OutputFormat::from_config_str("text"), OutputFormat::Text);
        assert_eq!(OutputFormat::from_config_str("yaml"), OutputFormat::Text);
        assert_eq!(OutputFormat::Json.as_config_str(), "json");
    }
}
