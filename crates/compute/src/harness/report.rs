use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timeslice_core::{Result, TimesliceError};
use tracing::info;
use uuid::Uuid;

use crate::scheduler::{SchedulerConfig, Termination};
use crate::workloads::WorkloadKind;

use super::types::StrategyResult;

const TEXT_HEADER: &str = "Execution Time (ms) for Each Method:";

/// Output format of a persisted report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for ReportFormat {
    type Err = TimesliceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(TimesliceError::Config(format!("unknown report format: {}", other))),
        }
    }
}

/// Side-by-side results of one harness run.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub tasks: usize,
    pub units_per_task: u64,
    pub workload: WorkloadKind,
    pub scheduler: SchedulerConfig,
    pub results: Vec<StrategyResult>,
}

impl ComparisonReport {
    pub fn new(
        tasks: usize,
        units_per_task: u64,
        workload: WorkloadKind,
        scheduler: SchedulerConfig,
        results: Vec<StrategyResult>,
    ) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            tasks,
            units_per_task,
            workload,
            scheduler,
            results,
        }
    }

    /// Every category seen in any strategy, in name order.
    pub fn categories(&self) -> Vec<&str> {
        let set: BTreeSet<&str> = self
            .results
            .iter()
            .flat_map(|r| r.totals.categories())
            .collect();
        set.into_iter().collect()
    }

    /// Human-readable report. A category missing from one strategy prints as 0.
    pub fn to_text(&self) -> String {
        let categories = self.categories();
        let mut out = String::new();
        let _ = writeln!(out, "{}", TEXT_HEADER);
        for result in &self.results {
            let _ = write!(out, "{} -", result.strategy);
            for category in &categories {
                let _ = write!(out, " {}: {}", category, result.totals.elapsed(category).as_millis());
            }
            let _ = write!(out, " (wall: {} ms", result.wall_clock.as_millis());
            if result.termination == Termination::Interrupted {
                let _ = write!(out, ", interrupted");
            }
            let _ = writeln!(out, ")");
        }
        let _ = writeln!(
            out,
            "# run_id={} generated_at={} tasks={} units_per_task={} workload={}",
            self.run_id,
            self.generated_at.to_rfc3339(),
            self.tasks,
            self.units_per_task,
            self.workload
        );
        out
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TimesliceError::Serialize(e.to_string()))
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Text => Ok(self.to_text()),
            ReportFormat::Json => self.to_json(),
        }
    }

    /// Write the report to `path`, replacing any previous file.
    pub fn write_to(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let body = self.render(format)?;
        std::fs::write(path, body)?;
        info!(path = %path.display(), run_id = %self.run_id, "Report written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use timeslice_core::CostTotals;

    use super::*;
    use crate::harness::Strategy;

    fn result(strategy: Strategy, totals: CostTotals, wall_ms: u64) -> StrategyResult {
        StrategyResult {
            strategy,
            totals,
            wall_clock: Duration::from_millis(wall_ms),
            tasks: 3,
            units_completed: 30,
            ticks: None,
            switches: None,
            termination: Termination::Completed,
        }
    }

    fn sample() -> ComparisonReport {
        let mut rr = CostTotals::single("matrix", Duration::from_millis(32));
        rr.record("merge", Duration::from_millis(123));
        rr.record("primes", Duration::from_millis(28));
        let pool = CostTotals::single("matrix", Duration::from_millis(40));

        ComparisonReport::new(
            3,
            10,
            WorkloadKind::Mixed,
            SchedulerConfig::default(),
            vec![
                result(Strategy::RoundRobin, rr, 15012),
                result(Strategy::WorkerPool, pool, 90),
            ],
        )
    }

    #[test]
    fn text_report_lines() {
        let text = sample().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Execution Time (ms) for Each Method:");
        assert_eq!(
            lines[1],
            "Round-Robin - matrix: 32 merge: 123 primes: 28 (wall: 15012 ms)"
        );
        assert_eq!(lines[2], "Worker Pool - matrix: 40 merge: 0 primes: 0 (wall: 90 ms)");
        assert!(lines[3].starts_with("# run_id="));
        assert!(lines[3].ends_with("workload=mixed"));
    }

    #[test]
    fn interrupted_strategy_is_marked() {
        let mut rr = result(Strategy::RoundRobin, CostTotals::single("fixed", Duration::ZERO), 0);
        rr.termination = Termination::Interrupted;
        let report = ComparisonReport::new(2, 2, WorkloadKind::Fixed, SchedulerConfig::default(), vec![rr]);

        let text = report.to_text();
        assert_eq!(
            text.lines().nth(1).unwrap(),
            "Round-Robin - fixed: 0 (wall: 0 ms, interrupted)"
        );

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("execution_times.txt");
        report.write_to(&path, ReportFormat::Text).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().contains(", interrupted)"));
    }

    #[test]
    fn json_report_fields() {
        let report = sample();
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["run_id"], report.run_id.to_string());
        assert_eq!(json["workload"], "mixed");
        assert_eq!(json["results"][0]["strategy"], "round-robin");
        assert_eq!(json["results"][0]["totals"]["merge"]["units"], 1);
        assert!(json["results"][0].get("ticks").is_none());
    }

    #[test]
    fn write_to_persists_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample();

        let text_path = dir.path().join("execution_times.txt");
        report.write_to(&text_path, ReportFormat::Text).unwrap();
        let text = std::fs::read_to_string(&text_path).unwrap();
        assert!(text.starts_with(TEXT_HEADER));

        let json_path = dir.path().join("report.json");
        report.write_to(&json_path, ReportFormat::Json).unwrap();
        let raw = std::fs::read_to_string(&json_path).unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&raw).is_ok());
    }

    #[test]
    fn write_to_missing_dir_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.txt");
        let err = sample().write_to(&path, ReportFormat::Text).unwrap_err();
        assert!(matches!(err, TimesliceError::Io(_)));
    }

    #[test]
    fn format_parses() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert_eq!("text".parse::<ReportFormat>().unwrap(), ReportFormat::Text);
        assert!("yaml".parse::<ReportFormat>().is_err());
    }
}
