use timeslice_core::{CostTotals, Workload};

/// Scheduler-facing wrapper around exactly one workload.
///
/// Forwards `run_once` and `is_done` and keeps a count of the units that
/// actually advanced the workload. It never touches the workload's progress
/// on its own.
pub struct Runnable {
    workload: Box<dyn Workload>,
    units: u64,
}

impl Runnable {
    pub fn new(workload: Box<dyn Workload>) -> Self {
        Self { workload, units: 0 }
    }

    pub fn from_workload<W: Workload + 'static>(workload: W) -> Self {
        Self::new(Box::new(workload))
    }

    pub fn label(&self) -> &str {
        self.workload.label()
    }

    pub fn run_once(&mut self) -> CostTotals {
        // A unit on a finished workload is a no-op and is not counted.
        if !self.workload.is_done() {
            self.units += 1;
        }
        self.workload.run_once()
    }

    pub fn is_done(&self) -> bool {
        self.workload.is_done()
    }

    /// Units executed through this wrapper that advanced the workload.
    pub fn units(&self) -> u64 {
        self.units
    }

    pub fn into_workload(self) -> Box<dyn Workload> {
        self.workload
    }
}

impl std::fmt::Debug for Runnable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runnable")
            .field("label", &self.label())
            .field("units", &self.units)
            .field("done", &self.is_done())
            .finish()
    }
}
