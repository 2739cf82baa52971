//! Cooperative, time-sliced round-robin scheduler.
//!
//! A single thread advances one [`Runnable`] per tick and hands the cursor to
//! the next task in insertion order once the active slice has elapsed (or
//! the active task has finished). The run ends when every task reports done.

pub mod clock;
pub mod metrics;
pub mod runnable;
pub mod runner;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use metrics::SchedulerMetrics;
pub use runnable::Runnable;
pub use runner::{all_tasks_done, CompletionPredicate, RoundRobinScheduler, TickHook};
pub use types::{ScheduleOutcome, SchedulerConfig, Termination, TickEvent};
