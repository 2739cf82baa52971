use std::time::Duration;

use serde::{Deserialize, Serialize};
use timeslice_core::CostTotals;

use super::metrics::SchedulerMetrics;

/// Round-robin scheduler configuration, typically parsed from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// How long a task stays active before the cursor moves on.
    #[serde(default = "default_slice_length")]
    pub slice_length_ms: u64,
    /// Pause between ticks; bounds the tick rate.
    #[serde(default = "default_tick_pause")]
    pub tick_pause_ms: u64,
}

fn default_slice_length() -> u64 { 1000 }
fn default_tick_pause() -> u64 { 500 }

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            slice_length_ms: default_slice_length(),
            tick_pause_ms: default_tick_pause(),
        }
    }
}

/// Whole milliseconds, rounding any sub-millisecond remainder up.
pub(crate) fn ceil_millis(duration: Duration) -> u64 {
    let millis = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
    if duration.subsec_nanos() % 1_000_000 == 0 {
        millis
    } else {
        millis.saturating_add(1)
    }
}

impl SchedulerConfig {
    /// Durations are stored in whole milliseconds, rounded up, so a nonzero
    /// duration never becomes zero.
    pub fn new(slice_length: Duration, tick_pause: Duration) -> Self {
        Self {
            slice_length_ms: ceil_millis(slice_length),
            tick_pause_ms: ceil_millis(tick_pause),
        }
    }

    /// A slice that never elapses: the scheduler runs tasks back to back.
    pub fn sequential(tick_pause: Duration) -> Self {
        Self {
            slice_length_ms: u64::MAX,
            tick_pause_ms: ceil_millis(tick_pause),
        }
    }

    pub fn slice_length(&self) -> Duration {
        Duration::from_millis(self.slice_length_ms)
    }

    pub fn tick_pause(&self) -> Duration {
        Duration::from_millis(self.tick_pause_ms)
    }

    /// Ticks a task stays active when both durations are honoured exactly.
    /// `None` when the pause is zero and the ratio is unbounded.
    pub fn ticks_per_slice(&self) -> Option<u64> {
        if self.tick_pause_ms == 0 {
            None
        } else {
            Some(self.slice_length_ms.div_ceil(self.tick_pause_ms).max(1))
        }
    }
}

/// One executed unit of work, handed to the tick hook.
#[derive(Debug)]
pub struct TickEvent<'a> {
    /// Zero-based tick number.
    pub tick: u64,
    /// Cursor position of the task that ran.
    pub task_index: usize,
    pub label: &'a str,
    /// Cost returned by this unit.
    pub delta: &'a CostTotals,
    /// Whether the task had already finished before this tick.
    pub was_done: bool,
}

/// How a scheduler run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Termination {
    /// No tasks, or every task was already done; no tick ran.
    Idle,
    /// The completion predicate held.
    Completed,
    /// The shutdown signal was raised before completion.
    Interrupted,
}

/// Totals plus run statistics returned by a scheduler run.
#[derive(Debug, Clone, Serialize)]
pub struct ScheduleOutcome {
    pub totals: CostTotals,
    pub termination: Termination,
    /// Units of work executed, including no-op units on finished tasks.
    pub ticks: u64,
    /// Number of cursor moves.
    pub switches: u64,
    /// Units that advanced each task, indexed like the task list.
    pub units_per_task: Vec<u64>,
    /// Wall-clock time from first tick to return, as seen by the scheduler clock.
    pub elapsed: Duration,
    pub metrics: SchedulerMetrics,
}

impl ScheduleOutcome {
    pub(crate) fn idle(task_count: usize) -> Self {
        Self {
            totals: CostTotals::new(),
            termination: Termination::Idle,
            ticks: 0,
            switches: 0,
            units_per_task: vec![0; task_count],
            elapsed: Duration::ZERO,
            metrics: SchedulerMetrics::default(),
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self.termination, Termination::Completed | Termination::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheduler_config_defaults() {
        let config = SchedulerConfig::default();
        assert_eq!(config.slice_length_ms, 1000);
        assert_eq!(config.tick_pause_ms, 500);
        assert_eq!(config.slice_length(), Duration::from_secs(1));
        assert_eq!(config.tick_pause(), Duration::from_millis(500));
    }

    #[test]
    fn ticks_per_slice_ratio() {
        assert_eq!(SchedulerConfig::default().ticks_per_slice(), Some(2));

        let config = SchedulerConfig::new(Duration::from_millis(1000), Duration::from_millis(300));
        assert_eq!(config.ticks_per_slice(), Some(4));

        let config = SchedulerConfig::new(Duration::ZERO, Duration::from_millis(10));
        assert_eq!(config.ticks_per_slice(), Some(1));

        let config = SchedulerConfig::new(Duration::from_millis(10), Duration::ZERO);
        assert_eq!(config.ticks_per_slice(), None);
    }

    #[test]
    fn sub_millisecond_durations_round_up() {
        let config = SchedulerConfig::new(Duration::from_micros(900), Duration::from_micros(300));
        assert_eq!(config.slice_length_ms, 1);
        assert_eq!(config.tick_pause_ms, 1);
        assert_eq!(config.ticks_per_slice(), Some(1));

        let config = SchedulerConfig::new(Duration::from_micros(1500), Duration::from_millis(2));
        assert_eq!(config.slice_length_ms, 2);
        assert_eq!(config.tick_pause_ms, 2);

        assert_eq!(ceil_millis(Duration::ZERO), 0);
        assert_eq!(ceil_millis(Duration::from_secs(u64::MAX)), u64::MAX);
    }

    #[test]
    fn sequential_config_never_elapses() {
        let config = SchedulerConfig::sequential(Duration::ZERO);
        assert_eq!(config.slice_length_ms, u64::MAX);
        assert_eq!(config.tick_pause(), Duration::ZERO);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let config: SchedulerConfig = toml::from_str("tick_pause_ms = 20").unwrap();
        assert_eq!(config.tick_pause_ms, 20);
        assert_eq!(config.slice_length_ms, 1000);
    }
}
