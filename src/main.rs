//! Drillout Analytics CLI
//!
//! Analyzes a drillout field tool kit workbook and writes the dashboard
//! result and exports.
//!
//! # Usage
//!
//! ```bash
//! # Analyze a field kit, writing JSON/CSV exports
//! drillout-analytics analyze kit.xlsx --out-dir reports/
//!
//! # Print the analysis JSON to stdout
//! drillout-analytics analyze kit.xlsx
//!
//! # Demo dataset
//! drillout-analytics demo --out-dir reports/
//!
//! # Effective configuration as TOML
//! drillout-analytics config
//! ```
//!
//! # Environment Variables
//!
//! - `DRILLOUT_CONFIG`: Path to a TOML config file
//! - `DRILLOUT_SEED`: Fixed seed for placeholder synthesis
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use drillout_analytics::{
    analyze_file_bounded, demo, export, AnalysisConfig, AnalysisResult,
};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "drillout-analytics")]
#[command(about = "Drillout field tool kit frequency and efficiency analysis")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides DRILLOUT_CONFIG and ./drillout_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Analyze a field tool kit workbook (.xlsx, .xlsm, .xls, .ods)
    Analyze {
        /// Workbook to analyze
        file: PathBuf,
        /// Directory for JSON/CSV exports; prints the analysis JSON when omitted
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
        /// Parse deadline in seconds (overrides workbook.parse_timeout_secs)
        #[arg(long, value_name = "SECS")]
        timeout: Option<u64>,
        /// Fixed synthesis seed for reproducible placeholders
        #[arg(long, env = "DRILLOUT_SEED")]
        seed: Option<u64>,
    },

    /// Produce the demo analysis
    Demo {
        /// Directory for JSON/CSV exports; prints the analysis JSON when omitted
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config,
}

fn init_logging(json: bool) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    let (config, source) =
        AnalysisConfig::resolve(path).context("Failed to load configuration")?;
    info!(source = %source, "Using configuration");
    Ok(config)
}

// ============================================================================
// Output
// ============================================================================

fn log_summary(result: &AnalysisResult) {
    let job = &result.job_summary;
    info!(
        "Job: {} | Ticket: {} | Well: {} | {} days",
        job.customer_name, job.ticket_number, job.well_number, job.duration_days
    );
    if let Some(ops) = &result.operational_frequency {
        info!(
            days = ops.total_operational_days,
            activities = ops.total_activities,
            work_hours = ops.total_work_hours,
            "Operational frequency"
        );
    }
    if let Some(mill) = &result.mill_performance {
        info!(
            plugs = mill.total_plugs_drilled,
            avg_mins = mill.avg_drill_time_mins,
            rating = %mill.efficiency_rating,
            "Mill performance"
        );
    }
    for note in &result.extraction_notes {
        warn!(kind = ?note.kind, sheet = note.sheet.as_deref().unwrap_or("-"), "{}", note.message);
    }
    for rec in &result.recommendations {
        info!("{rec}");
    }
}

fn emit(result: &AnalysisResult, out_dir: Option<&Path>) -> Result<()> {
    log_summary(result);
    match out_dir {
        Some(dir) => {
            let written = export::write_all(result, dir)
                .with_context(|| format!("Failed to write exports to {}", dir.display()))?;
            for path in written {
                info!("Wrote {}", path.display());
            }
        }
        None => {
            let json = export::to_json(result).context("Failed to encode analysis")?;
            println!("{json}");
        }
    }
    Ok(())
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    init_logging(args.log_json);

    let mut config = load_config(args.config.as_deref())?;

    match args.command {
        SubCommand::Analyze {
            file,
            out_dir,
            timeout,
            seed,
        } => {
            if let Some(secs) = timeout {
                config.workbook.parse_timeout_secs = secs;
            }
            if seed.is_some() {
                config.synthesis.seed = seed;
            }
            config.validate().context("Invalid configuration")?;

            info!(file = %file.display(), "Analyzing field tool kit");
            let result = analyze_file_bounded(&file, &config).await;
            if result.is_demo() {
                warn!("Workbook could not be analyzed, demo dataset returned");
            }
            emit(&result, out_dir.as_deref())
        }
        SubCommand::Demo { out_dir } => emit(&demo::analysis(&config), out_dir.as_deref()),
        SubCommand::Config => {
            let text = config.to_toml().context("Failed to encode config")?;
            println!("{text}");
            Ok(())
        }
    }
}
