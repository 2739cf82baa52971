//! Round-robin scheduler runner.
//!
//! Split into focused submodules:
//! - `core`: scheduler struct, construction, task registration, accessors
//! - `execution`: the tick loop

mod core;
mod execution;

pub use self::core::{all_tasks_done, CompletionPredicate, RoundRobinScheduler, TickHook};
