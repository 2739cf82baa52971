use serde::{Deserialize, Serialize};

use crate::cost::CostTotals;

/// A stateful, repeatable unit of computation the scheduler can drive.
///
/// Each implementation owns its own progress counter and completion
/// threshold. Progress only moves forward, and only through
/// [`Workload::run_once`].
///
/// Schedulers assume that repeated calls to `run_once` eventually make
/// `is_done` return `true`. A workload that never finishes stalls whatever
/// drives it.
///
/// Only `run_once` and `is_done` are required.
pub trait Workload: Send {
    /// Human-readable name for logging and reports.
    fn label(&self) -> &str {
        "workload"
    }

    /// Advance progress by exactly one unit and return what that unit cost.
    ///
    /// Once the workload is done this is a no-op returning empty totals.
    fn run_once(&mut self) -> CostTotals;

    /// Whether progress has reached the completion threshold.
    fn is_done(&self) -> bool;

    /// Units completed so far. Workloads without an exposed counter report 0.
    fn progress(&self) -> u64 {
        0
    }
}

impl<W: Workload + ?Sized> Workload for Box<W> {
    fn label(&self) -> &str {
        (**self).label()
    }

    fn run_once(&mut self) -> CostTotals {
        (**self).run_once()
    }

    fn is_done(&self) -> bool {
        (**self).is_done()
    }

    fn progress(&self) -> u64 {
        (**self).progress()
    }
}

/// Everything a workload factory needs to build one workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadSpec {
    pub label: String,
    /// Number of units after which the workload reports done.
    pub threshold: u64,
}

impl WorkloadSpec {
    pub fn new(label: impl Into<String>, threshold: u64) -> Self {
        Self {
            label: label.into(),
            threshold,
        }
    }

    /// Specs for `count` tasks named `{prefix}-1..={count}`, all sharing one threshold.
    pub fn numbered(prefix: &str, count: usize, threshold: u64) -> Vec<Self> {
        (1..=count)
            .map(|i| Self::new(format!("{prefix}-{i}"), threshold))
            .collect()
    }
}
