//! CrimeTally - crime incident CSV summarizer
//!
//! A CLI tool that reads a crime incident CSV export and reports
//! aggregate counts by shift, report hour, and offense, plus average
//! incident duration per offense category.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (missing file, malformed input, config failure)

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod report;

use analysis::{AggregateOptions, DurationPolicy};
use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use models::{Report, ReportMetadata};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("CrimeTally v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the report
    match run_report(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Report failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .crimetally.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".crimetally.toml");

    if path.exists() {
        eprintln!("⚠️  .crimetally.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .crimetally.toml")?;

    println!("✅ Created .crimetally.toml with default settings.");
    println!("   Edit it to customize column names, format, and malformed-row handling.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete report workflow. Returns the exit code.
fn run_report(args: Args) -> Result<i32> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let input = args
        .input
        .clone()
        .context("An input CSV file is required")?;

    // Step 1: Load the records
    info!("Loading incidents from {}", input.display());
    let fields = loader::FieldMap::from(&config.fields);
    let records = loader::load_records(&input, &fields)
        .with_context(|| format!("Failed to load {}", input.display()))?;

    // Handle --dry-run: count rows and exit
    if args.dry_run {
        println!(
            "Dry run: {} data rows in {} (no summaries computed).",
            records.len(),
            input.display()
        );
        return Ok(0);
    }

    // Step 2: Aggregate
    let policy = if config.report.true_elapsed {
        DurationPolicy::Elapsed
    } else {
        DurationPolicy::Legacy
    };
    let options = AggregateOptions {
        skip_malformed: config.loader.skip_malformed,
        policy,
    };
    debug!("Aggregating with {:?}", options);

    let summary = analysis::summarize(&records, &options)?;
    if summary.records_skipped > 0 {
        warn!("{} malformed records skipped", summary.records_skipped);
    }

    // Step 3: Build the report
    let duration = start_time.elapsed().as_secs_f64();
    let metadata = ReportMetadata {
        input_path: input.display().to_string(),
        generated_at: Utc::now(),
        records_loaded: records.len(),
        duration_seconds: duration,
    };
    let report = Report { metadata, summary };

    // Step 4: Render and write
    let format = match args.format {
        Some(format) => format,
        None => OutputFormat::from_config_str(&config.report.format),
    };
    let output = match format {
        OutputFormat::Text => report::generate_text_report(&report),
        OutputFormat::Json => report::generate_json_report(&report)?,
    };

    match args.output {
        Some(ref path) => {
            report::write_report(&output, path)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Report saved to: {}", path.display());
            println!(
                "   {} records read, {} skipped, {:.2}s",
                report.summary.records_read, report.summary.records_skipped, duration
            );
        }
        None => {
            print!("{}", output);
            if !output.ends_with('\n') {
                println!();
            }
        }
    }

    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .crimetally.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
