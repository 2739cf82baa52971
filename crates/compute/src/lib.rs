pub mod harness;
pub mod scheduler;
pub mod workloads;

pub use harness::{
    ComparisonReport, ExecutionHarness, HarnessConfig, HarnessError, ReportFormat, Strategy,
    StrategyResult,
};
pub use scheduler::{
    RoundRobinScheduler, Runnable, ScheduleOutcome, SchedulerConfig, SchedulerMetrics, Termination,
};
pub use workloads::{WorkloadConfig, WorkloadFactory, WorkloadKind};
