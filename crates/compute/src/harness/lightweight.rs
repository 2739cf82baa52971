use std::sync::Arc;
use std::time::Instant;

use timeslice_core::{CostTotals, WorkloadSpec};
use tracing::{debug, info, warn};

use crate::workloads::WorkloadFactory;

use super::types::{HarnessConfig, HarnessError, Strategy, StrategyResult, WorkerReport};

/// One tokio task per workload. Each task owns its workload, runs it to
/// completion and yields between units; results are joined before summing.
///
/// Units run directly on the runtime's worker threads, not `spawn_blocking`:
/// a task holds its worker for the length of one unit and only yields between units.
pub async fn run_lightweight(
    factory: &WorkloadFactory,
    specs: &[WorkloadSpec],
    config: &HarnessConfig,
) -> Result<StrategyResult, HarnessError> {
    info!(tasks = specs.len(), "Lightweight tasks starting");
    let unit_pause = config.unit_pause();
    let start = Instant::now();

    let mut handles = Vec::with_capacity(specs.len());
    for spec in specs {
        let factory = Arc::clone(factory);
        let spec = spec.clone();
        handles.push(tokio::spawn(async move {
            let mut workload = factory(&spec);
            let mut totals = CostTotals::new();
            let mut units = 0u64;
            while !workload.is_done() {
                totals.merge(&workload.run_once());
                units += 1;
                if unit_pause.is_zero() {
                    tokio::task::yield_now().await;
                } else {
                    tokio::time::sleep(unit_pause).await;
                }
            }
            WorkerReport {
                label: spec.label,
                totals,
                units,
            }
        }));
    }

    let mut reports = Vec::with_capacity(handles.len());
    for handle in handles {
        match handle.await {
            Ok(report) => {
                debug!(task = %report.label, units = report.units, "Lightweight task finished");
                reports.push(report);
            }
            Err(e) => {
                warn!(error = %e, "Lightweight task failed");
                return Err(HarnessError::WorkerLost {
                    strategy: Strategy::Lightweight,
                    expected: specs.len(),
                    received: reports.len(),
                });
            }
        }
    }

    let wall_clock = start.elapsed();
    info!(
        tasks = reports.len(),
        wall_ms = wall_clock.as_millis() as u64,
        "Lightweight tasks finished"
    );
    Ok(StrategyResult::from_reports(Strategy::Lightweight, &reports, wall_clock))
}

/// Build a multi-thread runtime and run [`run_lightweight`] on it.
pub fn run_lightweight_blocking(
    factory: &WorkloadFactory,
    specs: &[WorkloadSpec],
    config: &HarnessConfig,
) -> Result<StrategyResult, HarnessError> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("lightweight-worker")
        .build()
        .map_err(|e| HarnessError::Runtime(e.to_string()))?;
    runtime.block_on(run_lightweight(factory, specs, config))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use timeslice_core::Workload;

    use super::*;
    use crate::workloads::{FixedCost, WorkloadConfig};

    fn fixed_setup(tasks: usize, units: u64) -> (WorkloadFactory, Vec<WorkloadSpec>, HarnessConfig) {
        let config = HarnessConfig {
            tasks,
            units_per_task: units,
            ..HarnessConfig::default()
        };
        let factory = WorkloadConfig::fixed(Duration::from_millis(2)).factory();
        let specs = WorkloadSpec::numbered("task", tasks, units);
        (factory, specs, config)
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn lightweight_collects_every_task() {
        let (factory, specs, config) = fixed_setup(3, 5);
        let result = run_lightweight(&factory, &specs, &config).await.unwrap();

        assert_eq!(result.strategy, Strategy::Lightweight);
        assert_eq!(result.tasks, 3);
        assert_eq!(result.units_completed, 15);
        assert_eq!(result.totals.elapsed("fixed"), Duration::from_millis(30));
    }

    #[tokio::test]
    async fn lightweight_honours_unit_pause() {
        let (factory, specs, mut config) = fixed_setup(2, 3);
        config.unit_pause_ms = 5;
        let result = run_lightweight(&factory, &specs, &config).await.unwrap();

        assert_eq!(result.units_completed, 6);
        assert!(result.wall_clock >= Duration::from_millis(15));
    }

    #[tokio::test]
    async fn panicking_task_is_reported_lost() {
        let (_, specs, config) = fixed_setup(2, 1);
        let factory: WorkloadFactory = Arc::new(|spec: &WorkloadSpec| -> Box<dyn Workload> {
            if spec.label == "task-1" {
                panic!("boom");
            }
            Box::new(FixedCost::new(spec.label.clone(), spec.threshold, "cpu", Duration::ZERO))
        });

        let err = run_lightweight(&factory, &specs, &config).await.unwrap_err();
        assert!(matches!(
            err,
            HarnessError::WorkerLost { strategy: Strategy::Lightweight, received: 0, .. }
        ));
    }

    #[test]
    fn blocking_wrapper_builds_its_own_runtime() {
        let (factory, specs, config) = fixed_setup(2, 2);
        let result = run_lightweight_blocking(&factory, &specs, &config).unwrap();
        assert_eq!(result.totals.units("fixed"), 4);
    }
}
