//! Runs the same workload under three execution strategies and aggregates
//! their per-category cost so they can be reported side by side.
//!
//! - Round-robin: one thread, cooperative time slices ([`RoundRobinScheduler`]).
//! - Worker pool: a rayon pool, one job per workload ([`run_worker_pool`]).
//! - Lightweight: one tokio task per workload ([`run_lightweight`]).

mod lightweight;
mod pool;
mod report;
mod types;

pub use lightweight::{run_lightweight, run_lightweight_blocking};
pub use pool::run_worker_pool;
pub use report::{ComparisonReport, ReportFormat};
pub use types::{HarnessConfig, HarnessError, Strategy, StrategyResult};

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Instant;

use timeslice_core::WorkloadSpec;
use tracing::{info, warn};

use crate::scheduler::{RoundRobinScheduler, SchedulerConfig, Termination};
use crate::workloads::WorkloadFactory;

/// Owns the shared configuration and workload factory for a comparison run.
pub struct ExecutionHarness {
    scheduler: SchedulerConfig,
    config: HarnessConfig,
    factory: WorkloadFactory,
    /// Handed to the round-robin scheduler.
    shutdown: Arc<AtomicBool>,
}

impl ExecutionHarness {
    /// Harness whose factory is built from `config.workload`.
    pub fn new(scheduler: SchedulerConfig, config: HarnessConfig) -> Self {
        let factory = config.workload.factory();
        Self::with_factory(scheduler, config, factory)
    }

    /// Harness with a caller-supplied workload factory.
    pub fn with_factory(scheduler: SchedulerConfig, config: HarnessConfig, factory: WorkloadFactory) -> Self {
        Self {
            scheduler,
            config,
            factory,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn scheduler_config(&self) -> &SchedulerConfig {
        &self.scheduler
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Shared shutdown flag for the round-robin strategy.
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }

    /// One spec per task; every strategy receives the same list.
    pub fn specs(&self) -> Vec<WorkloadSpec> {
        WorkloadSpec::numbered("task", self.config.tasks, self.config.units_per_task)
    }

    pub fn run_round_robin(&self) -> StrategyResult {
        let specs = self.specs();
        let workloads = specs.iter().map(|spec| (self.factory)(spec));
        let scheduler = RoundRobinScheduler::from_workloads(self.scheduler.clone(), workloads)
            .with_shutdown_signal(self.shutdown_signal());

        let start = Instant::now();
        let outcome = scheduler.run_to_completion();
        let wall_clock = start.elapsed();

        StrategyResult {
            strategy: Strategy::RoundRobin,
            tasks: specs.len(),
            units_completed: outcome.units_per_task.iter().sum(),
            ticks: Some(outcome.ticks),
            switches: Some(outcome.switches),
            termination: outcome.termination,
            totals: outcome.totals,
            wall_clock,
        }
    }

    pub fn run_worker_pool(&self) -> Result<StrategyResult, HarnessError> {
        run_worker_pool(&self.factory, &self.specs(), &self.config)
    }

    /// Runs on a dedicated runtime; must not be called from inside one.
    pub fn run_lightweight(&self) -> Result<StrategyResult, HarnessError> {
        run_lightweight_blocking(&self.factory, &self.specs(), &self.config)
    }

    pub fn run(&self, strategy: Strategy) -> Result<StrategyResult, HarnessError> {
        info!(%strategy, tasks = self.config.tasks, units = self.config.units_per_task, "Running strategy");
        let result = match strategy {
            Strategy::RoundRobin => Ok(self.run_round_robin()),
            Strategy::WorkerPool => self.run_worker_pool(),
            Strategy::Lightweight => self.run_lightweight(),
        }?;
        info!(
            %strategy,
            wall_ms = result.wall_clock.as_millis() as u64,
            units = result.units_completed,
            "Strategy finished"
        );
        Ok(result)
    }

    /// Run `strategies` in order and collect them into one report. Stops after
    /// a strategy that the shutdown flag interrupted.
    pub fn run_strategies(&self, strategies: &[Strategy]) -> Result<ComparisonReport, HarnessError> {
        let mut results = Vec::with_capacity(strategies.len());
        for &strategy in strategies {
            let result = self.run(strategy)?;
            let interrupted = result.termination == Termination::Interrupted;
            results.push(result);
            if interrupted {
                warn!(%strategy, "Shutdown requested, skipping remaining strategies");
                break;
            }
        }
        Ok(ComparisonReport::new(
            self.config.tasks,
            self.config.units_per_task,
            self.config.workload.kind,
            self.scheduler.clone(),
            results,
        ))
    }

    pub fn run_all(&self) -> Result<ComparisonReport, HarnessError> {
        self.run_strategies(&Strategy::ALL)
    }
}

impl std::fmt::Debug for ExecutionHarness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionHarness")
            .field("scheduler", &self.scheduler)
            .field("config", &self.config)
            .finish()
    }
}
