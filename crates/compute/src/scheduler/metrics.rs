use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

/// Per-task execution metrics collected during a scheduler run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SchedulerMetrics {
    /// Units executed by task label.
    pub units_executed: HashMap<String, u64>,
    /// Average unit duration by task label.
    pub avg_unit_duration: HashMap<String, Duration>,
    /// Ticks spent on tasks that had already finished.
    pub idle_ticks: u64,
}

impl SchedulerMetrics {
    /// Record a unit that advanced `task_name`.
    pub fn record_execution(&mut self, task_name: &str, duration: Duration) {
        *self.units_executed.entry(task_name.to_string()).or_default() += 1;

        let count = self.units_executed[task_name];
        let prev_avg = self
            .avg_unit_duration
            .get(task_name)
            .copied()
            .unwrap_or_default();

        // Incremental mean: new_avg = prev_avg + (duration - prev_avg) / count
        let new_avg = if count == 1 {
            duration
        } else {
            let prev_nanos = prev_avg.as_nanos() as f64;
            let cur_nanos = duration.as_nanos() as f64;
            let avg_nanos = prev_nanos + (cur_nanos - prev_nanos) / count as f64;
            Duration::from_nanos(avg_nanos as u64)
        };

        self.avg_unit_duration.insert(task_name.to_string(), new_avg);
    }

    /// Record a no-op tick on a finished task.
    pub fn record_idle(&mut self) {
        self.idle_ticks += 1;
    }
}
