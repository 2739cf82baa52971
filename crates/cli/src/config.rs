use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use timeslice_compute::{HarnessConfig, SchedulerConfig, Strategy, WorkloadKind};
use tracing::debug;

use crate::cli::{CliArgs, StrategyArg};

/// Benchmark configuration loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BenchConfig {
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub harness: HarnessConfig,
}

impl BenchConfig {
    /// Load config from `path`. No path, or a missing file, yields defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!(config_path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        debug!(config_path = %path.display(), "Loading config");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Self = toml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        Ok(config)
    }

    /// Command-line values take priority over the file.
    pub fn apply_overrides(&mut self, args: &CliArgs) -> Result<()> {
        if let Some(tasks) = args.tasks {
            self.harness.tasks = tasks;
        }
        if let Some(units) = args.units {
            self.harness.units_per_task = units;
        }
        if let Some(kind) = &args.workload {
            self.harness.workload.kind = kind
                .parse::<WorkloadKind>()
                .with_context(|| format!("invalid --workload: {}", kind))?;
        }
        if let Some(seed) = args.seed {
            self.harness.workload.seed = Some(seed);
        }
        if let Some(slice) = args.slice_ms {
            self.scheduler.slice_length_ms = slice;
        }
        if let Some(tick) = args.tick_ms {
            self.scheduler.tick_pause_ms = tick;
        }
        Ok(())
    }
}

pub fn strategies(arg: StrategyArg) -> Vec<Strategy> {
    match arg {
        StrategyArg::All => Strategy::ALL.to_vec(),
        StrategyArg::RoundRobin => vec![Strategy::RoundRobin],
        StrategyArg::WorkerPool => vec![Strategy::WorkerPool],
        StrategyArg::Lightweight => vec![Strategy::Lightweight],
    }
}
