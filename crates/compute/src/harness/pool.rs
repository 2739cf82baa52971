use std::sync::mpsc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use timeslice_core::{CostTotals, Workload, WorkloadSpec};
use tracing::{debug, error, info};

use crate::workloads::WorkloadFactory;

use super::types::{HarnessConfig, HarnessError, Strategy, StrategyResult, WorkerReport};

/// Run one workload to completion on the current thread, no switching.
pub(crate) fn drive_to_completion(workload: &mut dyn Workload, unit_pause: Duration) -> WorkerReport {
    let mut totals = CostTotals::new();
    let mut units = 0u64;
    while !workload.is_done() {
        totals.merge(&workload.run_once());
        units += 1;
        if !unit_pause.is_zero() {
            std::thread::sleep(unit_pause);
        }
    }
    WorkerReport {
        label: workload.label().to_string(),
        totals,
        units,
    }
}

/// Fixed-size worker pool: every workload is owned by one pool job that runs
/// it to completion and sends its totals back over a channel.
pub fn run_worker_pool(
    factory: &WorkloadFactory,
    specs: &[WorkloadSpec],
    config: &HarnessConfig,
) -> Result<StrategyResult, HarnessError> {
    let num_workers = config.resolved_worker_threads();
    info!(workers = num_workers, tasks = specs.len(), "Worker pool starting");

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(num_workers)
        .thread_name(|i| format!("pool-worker-{}", i))
        .panic_handler(|_| error!("Pool worker panicked; its workload will not report"))
        .build()
        .map_err(|e| HarnessError::PoolBuild(e.to_string()))?;

    let (sender, receiver) = mpsc::channel::<WorkerReport>();
    let unit_pause = config.unit_pause();
    let start = Instant::now();

    for spec in specs {
        let factory = Arc::clone(factory);
        let spec = spec.clone();
        let sender = sender.clone();
        pool.spawn(move || {
            let mut workload = factory(&spec);
            let report = drive_to_completion(workload.as_mut(), unit_pause);
            debug!(task = %report.label, units = report.units, "Pool worker finished");
            // The receiver outlives every job unless the harness already failed.
            let _ = sender.send(report);
        });
    }
    // Only the jobs hold senders now; recv fails once they are all gone.
    drop(sender);

    let mut reports = Vec::with_capacity(specs.len());
    while reports.len() < specs.len() {
        match receiver.recv() {
            Ok(report) => reports.push(report),
            Err(_) => {
                return Err(HarnessError::WorkerLost {
                    strategy: Strategy::WorkerPool,
                    expected: specs.len(),
                    received: reports.len(),
                })
            }
        }
    }

    let wall_clock = start.elapsed();
    info!(
        tasks = reports.len(),
        wall_ms = wall_clock.as_millis() as u64,
        "Worker pool finished"
    );
    Ok(StrategyResult::from_reports(Strategy::WorkerPool, &reports, wall_clock))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::workloads::{FixedCost, WorkloadConfig};

    #[test]
    fn drive_runs_until_done() {
        let mut w = FixedCost::new("a", 4, "cpu", Duration::from_millis(1));
        let report = drive_to_completion(&mut w, Duration::ZERO);
        assert!(w.is_done());
        assert_eq!(report.units, 4);
        assert_eq!(report.label, "a");
        assert_eq!(report.totals.elapsed("cpu"), Duration::from_millis(4));
    }

    #[test]
    fn pool_collects_every_worker() {
        let config = HarnessConfig {
            tasks: 3,
            units_per_task: 5,
            ..HarnessConfig::default()
        };
        let factory = WorkloadConfig::fixed(Duration::from_millis(2)).factory();
        let specs = WorkloadSpec::numbered("task", config.tasks, config.units_per_task);

        let result = run_worker_pool(&factory, &specs, &config).unwrap();
        assert_eq!(result.strategy, Strategy::WorkerPool);
        assert_eq!(result.tasks, 3);
        assert_eq!(result.units_completed, 15);
        assert_eq!(result.totals.units("fixed"), 15);
        assert_eq!(result.totals.elapsed("fixed"), Duration::from_millis(30));
    }

    #[test]
    fn pool_with_fewer_threads_than_tasks() {
        let config = HarnessConfig {
            tasks: 4,
            units_per_task: 2,
            worker_threads: 1,
            ..HarnessConfig::default()
        };
        let factory = WorkloadConfig::fixed(Duration::from_millis(1)).factory();
        let specs = WorkloadSpec::numbered("task", config.tasks, config.units_per_task);

        let result = run_worker_pool(&factory, &specs, &config).unwrap();
        assert_eq!(result.units_completed, 8);
    }

    #[test]
    fn panicking_worker_is_reported_lost() {
        let config = HarnessConfig {
            tasks: 2,
            units_per_task: 1,
            ..HarnessConfig::default()
        };
        let factory: WorkloadFactory = Arc::new(|spec: &WorkloadSpec| -> Box<dyn Workload> {
            if spec.label == "task-2" {
                panic!("boom");
            }
            Box::new(FixedCost::new(spec.label.clone(), spec.threshold, "cpu", Duration::ZERO))
        });
        let specs = WorkloadSpec::numbered("task", config.tasks, config.units_per_task);

        let err = run_worker_pool(&factory, &specs, &config).unwrap_err();
        match err {
            HarnessError::WorkerLost { strategy, expected, received } => {
                assert_eq!(strategy, Strategy::WorkerPool);
                assert_eq!(expected, 2);
                assert_eq!(received, 1);
            }
            other => panic!("unexpected error: {}", other),
        }
    }
}
