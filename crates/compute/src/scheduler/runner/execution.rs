use std::sync::atomic::Ordering;

use timeslice_core::CostTotals;
use tracing::{debug, info, warn};

use crate::scheduler::metrics::SchedulerMetrics;
use crate::scheduler::types::{ScheduleOutcome, Termination, TickEvent};

use super::RoundRobinScheduler;

impl RoundRobinScheduler {
    /// Drive every task to completion and return the accumulated cost.
    pub fn run(self) -> CostTotals {
        self.run_to_completion().totals
    }

    /// Run the tick loop until the completion predicate holds or shutdown is
    /// signaled. Consumes the scheduler; all task state is dropped on return.
    pub fn run_to_completion(mut self) -> ScheduleOutcome {
        let task_count = self.tasks.len();
        if task_count == 0 {
            debug!("No tasks registered, nothing to schedule");
            return ScheduleOutcome::idle(0);
        }
        if (self.completion)(&self.tasks) {
            debug!(tasks = task_count, "All tasks already complete");
            return ScheduleOutcome::idle(task_count);
        }

        let slice_length = self.config.slice_length();
        let tick_pause = self.config.tick_pause();
        info!(
            tasks = task_count,
            slice_ms = self.config.slice_length_ms,
            tick_ms = self.config.tick_pause_ms,
            "Round-robin scheduler starting"
        );

        let start = self.clock.now();
        // None when the slice is too long to represent: the cursor never moves.
        let mut deadline = start.checked_add(slice_length);
        let mut cursor = 0usize;
        let mut accumulated = CostTotals::new();
        let mut metrics = SchedulerMetrics::default();
        let mut ticks = 0u64;
        let mut switches = 0u64;

        let termination = loop {
            if self.shutdown.load(Ordering::Relaxed) {
                break Termination::Interrupted;
            }

            let now = self.clock.now();

            let task = &mut self.tasks[cursor];
            let was_done = task.is_done();
            let delta = task.run_once();
            accumulated.merge(&delta);
            if was_done {
                metrics.record_idle();
            } else {
                metrics.record_execution(task.label(), delta.total_elapsed());
            }
            if let Some(hook) = self.tick_hook.as_mut() {
                hook(&TickEvent {
                    tick: ticks,
                    task_index: cursor,
                    label: task.label(),
                    delta: &delta,
                    was_done,
                });
            }
            ticks += 1;

            // Completion wins over switching: no switch after the final unit.
            if (self.completion)(&self.tasks) {
                break Termination::Completed;
            }

            // A finished task gives up the rest of its slice.
            let slice_over = deadline.is_some_and(|d| now >= d);
            if slice_over || self.tasks[cursor].is_done() {
                let previous = cursor;
                cursor = (cursor + 1) % task_count;
                deadline = now.checked_add(slice_length);
                switches += 1;
                debug!(
                    tick = ticks,
                    from = self.tasks[previous].label(),
                    to = self.tasks[cursor].label(),
                    slice_over,
                    "Switching task"
                );
            }

            self.clock.pause(tick_pause);
        };

        let elapsed = self.clock.now().saturating_duration_since(start);
        match termination {
            Termination::Interrupted => warn!(
                ticks,
                switches,
                elapsed_ms = elapsed.as_millis() as u64,
                "Round-robin scheduler interrupted, returning partial totals"
            ),
            _ => info!(
                ticks,
                switches,
                elapsed_ms = elapsed.as_millis() as u64,
                "Round-robin scheduler finished"
            ),
        }

        ScheduleOutcome {
            totals: accumulated,
            termination,
            ticks,
            switches,
            units_per_task: self.tasks.iter().map(|t| t.units()).collect(),
            elapsed,
            metrics,
        }
    }
}
