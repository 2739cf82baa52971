pub mod cost;
pub mod error;
pub mod workload;

pub use cost::{CategoryCost, CostTotals};
pub use error::*;
pub use workload::{Workload, WorkloadSpec};
