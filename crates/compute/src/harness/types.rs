use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use timeslice_core::{CostTotals, TimesliceError};

use crate::scheduler::Termination;
use crate::workloads::WorkloadConfig;

/// Error type for the execution harness.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("Failed to build worker pool: {0}")]
    PoolBuild(String),
    #[error("Failed to build async runtime: {0}")]
    Runtime(String),
    #[error("{strategy}: only {received} of {expected} workers reported")]
    WorkerLost {
        strategy: Strategy,
        expected: usize,
        received: usize,
    },
}

/// An execution strategy the harness can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Single-threaded cooperative time slicing.
    RoundRobin,
    /// One pool thread per workload, each run to completion.
    WorkerPool,
    /// One tokio task per workload, each run to completion.
    Lightweight,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::RoundRobin, Strategy::WorkerPool, Strategy::Lightweight];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::RoundRobin => "Round-Robin",
            Strategy::WorkerPool => "Worker Pool",
            Strategy::Lightweight => "Lightweight Tasks",
        };
        f.write_str(name)
    }
}

impl FromStr for Strategy {
    type Err = TimesliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "round-robin" | "rr" => Ok(Strategy::RoundRobin),
            "worker-pool" | "pool" | "threads" => Ok(Strategy::WorkerPool),
            "lightweight" | "tasks" => Ok(Strategy::Lightweight),
            other => Err(TimesliceError::Config(format!("unknown strategy: {}", other))),
        }
    }
}

/// Harness configuration, typically parsed from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Number of workloads per strategy.
    #[serde(default = "default_tasks")]
    pub tasks: usize,
    /// Completion threshold of every workload.
    #[serde(default = "default_units_per_task")]
    pub units_per_task: u64,
    /// Pause between units in the parallel strategies.
    #[serde(default)]
    pub unit_pause_ms: u64,
    /// Worker pool size. 0 = one thread per task.
    #[serde(default)]
    pub worker_threads: usize,
    #[serde(default)]
    pub workload: WorkloadConfig,
}

fn default_tasks() -> usize { 3 }
fn default_units_per_task() -> u64 { 10 }

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            tasks: default_tasks(),
            units_per_task: default_units_per_task(),
            unit_pause_ms: 0,
            worker_threads: 0,
            workload: WorkloadConfig::default(),
        }
    }
}

impl HarnessConfig {
    pub fn unit_pause(&self) -> Duration {
        Duration::from_millis(self.unit_pause_ms)
    }

    /// Resolve pool size (0 means one thread per task, at least one).
    pub fn resolved_worker_threads(&self) -> usize {
        if self.worker_threads == 0 {
            self.tasks.max(1)
        } else {
            self.worker_threads
        }
    }
}

/// What a single parallel worker hands back over its channel.
#[derive(Debug, Clone)]
pub(crate) struct WorkerReport {
    pub label: String,
    pub totals: CostTotals,
    pub units: u64,
}

/// Aggregated result of one strategy.
#[derive(Debug, Clone, Serialize)]
pub struct StrategyResult {
    pub strategy: Strategy,
    /// Per-category totals summed over every workload.
    pub totals: CostTotals,
    /// Wall-clock time from the first unit to the last result.
    pub wall_clock: Duration,
    pub tasks: usize,
    /// Units that advanced a workload, over all workloads.
    pub units_completed: u64,
    /// Scheduler ticks; round-robin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticks: Option<u64>,
    /// Task switches; round-robin only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub switches: Option<u64>,
    pub termination: Termination,
}

impl StrategyResult {
    pub(crate) fn from_reports(
        strategy: Strategy,
        reports: &[WorkerReport],
        wall_clock: Duration,
    ) -> Self {
        Self {
            strategy,
            totals: CostTotals::sum(reports.iter().map(|r| &r.totals)),
            wall_clock,
            tasks: reports.len(),
            units_completed: reports.iter().map(|r| r.units).sum(),
            ticks: None,
            switches: None,
            termination: Termination::Completed,
        }
    }
}
