use std::time::Duration;

use timeslice_core::{CostTotals, Workload};

use super::Progress;

/// Workload that does no computation and reports a fixed cost per unit.
///
/// Deterministic, so totals are identical under every execution strategy.
#[derive(Debug, Clone)]
pub struct FixedCost {
    label: String,
    category: String,
    cost: Duration,
    progress: Progress,
}

impl FixedCost {
    pub fn new(
        label: impl Into<String>,
        threshold: u64,
        category: impl Into<String>,
        cost: Duration,
    ) -> Self {
        Self {
            label: label.into(),
            category: category.into(),
            cost,
            progress: Progress::new(threshold),
        }
    }
}

impl Workload for FixedCost {
    fn label(&self) -> &str {
        &self.label
    }

    fn run_once(&mut self) -> CostTotals {
        if self.progress.is_done() {
            return CostTotals::new();
        }
        self.progress.advance();
        CostTotals::single(self.category.as_str(), self.cost)
    }

    fn is_done(&self) -> bool {
        self.progress.is_done()
    }

    fn progress(&self) -> u64 {
        self.progress.completed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reaches_threshold_after_exact_units() {
        let mut w = FixedCost::new("a", 3, "cpu", Duration::from_millis(2));
        for _ in 0..3 {
            assert!(!w.is_done());
            w.run_once();
        }
        assert!(w.is_done());
        assert_eq!(w.progress(), 3);
    }

    #[test]
    fn run_after_done_is_noop() {
        let mut w = FixedCost::new("a", 1, "cpu", Duration::from_millis(2));
        assert_eq!(w.run_once().elapsed("cpu"), Duration::from_millis(2));
        assert!(w.run_once().is_empty());
        assert_eq!(w.progress(), 1);
    }

    #[test]
    fn zero_threshold_starts_done() {
        let w = FixedCost::new("a", 0, "cpu", Duration::ZERO);
        assert!(w.is_done());
    }
}
