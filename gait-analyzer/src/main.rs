//! gait-analyzer - Gait trial analysis tool
//!
//! Scans a collection root for per-day markers and kinematics workbooks,
//! extracts the windowed joint-angle maxima of every trial and writes one
//! result report per activity.

use anyhow::{Context, Result};
use clap::Parser;
use gait_analyzer::export::{sink_for, write_reports};
use gait_analyzer::{AnalysisRun, AnalysisSettings};
use gait_common::config::{validate_root_folder, OutputFormat, RootFolderResolver, TomlConfig};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for gait-analyzer
#[derive(Parser, Debug)]
#[command(name = "gait-analyzer")]
#[command(about = "Windowed joint-angle maxima from gait collection workbooks")]
#[command(version)]
struct Args {
    /// Collection root folder (overrides GAIT_ROOT_FOLDER and the config file)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Configuration file (default: <config_dir>/gait-analysis/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First collection day
    #[arg(long)]
    first_day: Option<u32>,

    /// Number of collection days
    #[arg(long)]
    days: Option<u32>,

    /// Trials recorded per side
    #[arg(long)]
    trials: Option<u32>,

    /// Folder receiving the reports (default: the root folder)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Report format: xlsx or csv
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Log level used when RUST_LOG is not set
    #[arg(long)]
    log_level: Option<String>,

    /// Also write results, averages and run statistics as JSON
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Args {
    /// Apply command-line overrides on top of the file configuration
    fn apply_to(&self, config: &mut TomlConfig) {
        if let Some(day) = self.first_day {
            config.first_day = day;
        }
        if let Some(days) = self.days {
            config.day_count = days;
        }
        if let Some(trials) = self.trials {
            config.trials_per_side = trials;
        }
        if let Some(output) = &self.output {
            config.output_folder = Some(output.clone());
        }
        if let Some(format) = self.format {
            config.output_format = format;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    args.apply_to(&mut config);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!(
        "Starting gait-analyzer v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    config.validate().context("Invalid configuration")?;

    let root = match RootFolderResolver::new().resolve(args.root.as_deref(), &config) {
        Some((path, source)) => {
            info!("Root folder from {}: {}", source, path.display());
            path
        }
        None => prompt_root_folder().context("Failed to read root folder")?,
    };
    let root = validate_root_folder(&root).context("Invalid root folder")?;

    let settings = AnalysisSettings::from_config(root, &config);
    let sink = sink_for(settings.output_format);
    let output_folder = settings.output_folder.clone();

    let report = AnalysisRun::new(settings)
        .run()
        .context("Analysis failed")?;

    let written = write_reports(
        sink.as_ref(),
        &output_folder,
        &report.results,
        &report.averages,
    )
    .context("Failed to write reports")?;
    info!("{} reports written to {}", written.len(), output_folder.display());

    if let Some(path) = &args.summary_json {
        report
            .write_json(path)
            .with_context(|| format!("Failed to write summary {}", path.display()))?;
        info!("Run summary saved to {}", path.display());
    }

    Ok(())
}

/// Ask for the root folder on stdin
fn prompt_root_folder() -> io::Result<PathBuf> {
    print!("Enter the collection root folder path: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(PathBuf::from(line.trim()))
}
