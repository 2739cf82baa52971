use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use timeslice_core::Workload;
use tracing::{debug, info};

use crate::scheduler::clock::{Clock, SystemClock};
use crate::scheduler::runnable::Runnable;
use crate::scheduler::types::{SchedulerConfig, TickEvent};

/// Decides when a run is over, given the full task list.
pub type CompletionPredicate = Box<dyn Fn(&[Runnable]) -> bool + Send>;

/// Observer called after every executed unit of work.
pub type TickHook = Box<dyn FnMut(&TickEvent<'_>) + Send>;

/// Default completion predicate: every task reports done.
pub fn all_tasks_done(tasks: &[Runnable]) -> bool {
    tasks.iter().all(Runnable::is_done)
}

/// Cooperative, time-sliced round-robin scheduler.
///
/// Runs one unit of work per tick on the task under the cursor and moves
/// the cursor to the next task (in insertion order, wrapping) once the
/// current slice has elapsed. A run ends when the completion predicate
/// holds, by default when every task is done.
///
/// Every registered workload must eventually report done; otherwise
/// [`RoundRobinScheduler::run`] does not return unless the shutdown signal
/// is raised.
pub struct RoundRobinScheduler {
    pub(super) config: SchedulerConfig,
    /// Runnable tasks in insertion order. Never reordered.
    pub(super) tasks: Vec<Runnable>,
    pub(super) completion: CompletionPredicate,
    pub(super) tick_hook: Option<TickHook>,
    pub(super) clock: Arc<dyn Clock>,
    /// Shutdown signal.
    pub(super) shutdown: Arc<AtomicBool>,
}

impl RoundRobinScheduler {
    /// Create an empty scheduler driven by the system clock.
    pub fn new(config: SchedulerConfig) -> Self {
        Self {
            config,
            tasks: Vec::new(),
            completion: Box::new(all_tasks_done),
            tick_hook: None,
            clock: Arc::new(SystemClock),
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Create a scheduler with one task per workload, in iteration order.
    pub fn from_workloads<I>(config: SchedulerConfig, workloads: I) -> Self
    where
        I: IntoIterator<Item = Box<dyn Workload>>,
    {
        let mut scheduler = Self::new(config);
        for workload in workloads {
            scheduler.add_workload(workload);
        }
        scheduler
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Replace the completion predicate.
    pub fn with_completion<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&[Runnable]) -> bool + Send + 'static,
    {
        self.completion = Box::new(predicate);
        self
    }

    /// Share an externally owned shutdown flag instead of the scheduler's own.
    pub fn with_shutdown_signal(mut self, signal: Arc<AtomicBool>) -> Self {
        self.shutdown = signal;
        self
    }

    /// Install an observer called after every executed unit.
    pub fn with_tick_hook<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&TickEvent<'_>) + Send + 'static,
    {
        self.tick_hook = Some(Box::new(hook));
        self
    }

    /// Add a task. Returns its position in the rotation.
    pub fn add_runnable(&mut self, runnable: Runnable) -> usize {
        let index = self.tasks.len();
        debug!(index, label = runnable.label(), "Registered task");
        self.tasks.push(runnable);
        index
    }

    pub fn add_workload(&mut self, workload: Box<dyn Workload>) -> usize {
        self.add_runnable(Runnable::new(workload))
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn tasks(&self) -> &[Runnable] {
        &self.tasks
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Ask a running loop to stop after the current tick.
    pub fn shutdown(&self) {
        info!("Scheduler shutdown requested");
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Get an Arc to the shutdown flag (for external shutdown signaling).
    pub fn shutdown_signal(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.shutdown)
    }
}

impl std::fmt::Debug for RoundRobinScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundRobinScheduler")
            .field("config", &self.config)
            .field("tasks", &self.tasks)
            .field("has_tick_hook", &self.tick_hook.is_some())
            .finish()
    }
}
