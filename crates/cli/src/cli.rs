use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Compare round-robin time slicing against a worker pool and lightweight tasks.
///
/// Runs the same workload under each strategy and writes the summed
/// per-category execution time of every strategy to a report file.
#[derive(Parser, Debug)]
#[command(name = "timeslice-bench", version, about)]
pub struct CliArgs {
    /// Path to a TOML config file with [scheduler] and [harness] tables
    #[arg(long, env = "TIMESLICE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of workloads per strategy
    #[arg(long, env = "TIMESLICE_TASKS")]
    pub tasks: Option<usize>,

    /// Units of work each workload must complete
    #[arg(long, env = "TIMESLICE_UNITS")]
    pub units: Option<u64>,

    /// Workload kind: matrix, merge, primes, mixed or fixed
    #[arg(long, env = "TIMESLICE_WORKLOAD")]
    pub workload: Option<String>,

    /// Round-robin slice length in milliseconds
    #[arg(long, env = "TIMESLICE_SLICE_MS")]
    pub slice_ms: Option<u64>,

    /// Pause between round-robin ticks in milliseconds
    #[arg(long, env = "TIMESLICE_TICK_MS")]
    pub tick_ms: Option<u64>,

    /// Seed for workload inputs (random when unset)
    #[arg(long, env = "TIMESLICE_SEED")]
    pub seed: Option<u64>,

    /// Report output path
    #[arg(long, env = "TIMESLICE_OUTPUT", default_value = "execution_times.txt")]
    pub output: PathBuf,

    /// Report format: text or json
    #[arg(long, env = "TIMESLICE_FORMAT", default_value = "text")]
    pub format: String,

    /// Which strategies to run
    #[arg(long, value_enum, default_value_t = StrategyArg::All)]
    pub strategy: StrategyArg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    All,
    RoundRobin,
    WorkerPool,
    Lightweight,
}
