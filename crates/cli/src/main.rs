mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use timeslice_compute::{ExecutionHarness, ReportFormat};
use tracing::info;

use crate::cli::CliArgs;
use crate::config::{strategies, BenchConfig};

// Not async: the lightweight strategy owns its runtime.
fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();

    let mut config = BenchConfig::load(args.config.as_deref()).context("failed to load configuration")?;
    config.apply_overrides(&args)?;
    let format: ReportFormat = args
        .format
        .parse()
        .with_context(|| format!("invalid --format: {}", args.format))?;

    info!(
        tasks = config.harness.tasks,
        units = config.harness.units_per_task,
        workload = %config.harness.workload.kind,
        slice_ms = config.scheduler.slice_length_ms,
        tick_ms = config.scheduler.tick_pause_ms,
        "Starting benchmark"
    );

    let harness = ExecutionHarness::new(config.scheduler, config.harness);
    let report = harness
        .run_strategies(&strategies(args.strategy))
        .context("benchmark run failed")?;

    report
        .write_to(&args.output, format)
        .with_context(|| format!("failed to write report: {}", args.output.display()))?;

    print!("{}", report.to_text());
    println!("Execution times saved to {}", args.output.display());
    Ok(())
}
