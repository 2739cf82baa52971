use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use timeslice_core::{TimesliceError, Workload, WorkloadSpec};

use crate::scheduler::types::ceil_millis;

use super::{FixedCost, MatrixMultiply, MergeSort, MixedProcessor, PrimeSieve};

/// Builds one fresh workload per spec. Shared by every execution strategy so
/// they all run the same kind of work.
pub type WorkloadFactory = Arc<dyn Fn(&WorkloadSpec) -> Box<dyn Workload> + Send + Sync>;

/// Which workload the harness runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkloadKind {
    Matrix,
    Merge,
    Primes,
    /// Matrix, merge and primes in every unit.
    Mixed,
    /// No computation; fixed reported cost.
    Fixed,
}

impl fmt::Display for WorkloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkloadKind::Matrix => "matrix",
            WorkloadKind::Merge => "merge",
            WorkloadKind::Primes => "primes",
            WorkloadKind::Mixed => "mixed",
            WorkloadKind::Fixed => "fixed",
        };
        f.write_str(name)
    }
}

impl FromStr for WorkloadKind {
    type Err = TimesliceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "matrix" => Ok(WorkloadKind::Matrix),
            "merge" | "sort" => Ok(WorkloadKind::Merge),
            "primes" | "sieve" => Ok(WorkloadKind::Primes),
            "mixed" => Ok(WorkloadKind::Mixed),
            "fixed" => Ok(WorkloadKind::Fixed),
            other => Err(TimesliceError::Config(format!("unknown workload kind: {}", other))),
        }
    }
}

/// Workload selection and sizing, typically parsed from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadConfig {
    #[serde(default = "default_kind")]
    pub kind: WorkloadKind,
    /// Side length of the square matrices.
    #[serde(default = "default_matrix_size")]
    pub matrix_size: usize,
    /// Length of the array sorted per unit.
    #[serde(default = "default_array_len")]
    pub array_len: usize,
    /// Upper bound of the prime sieve.
    #[serde(default = "default_prime_limit")]
    pub prime_limit: usize,
    /// Cost reported per unit by the `fixed` workload.
    #[serde(default = "default_fixed_cost")]
    pub fixed_cost_ms: u64,
    /// Category used by the `fixed` workload.
    #[serde(default = "default_fixed_category")]
    pub fixed_category: String,
    /// Seed for workload inputs. Each task derives its own seed from this.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_kind() -> WorkloadKind { WorkloadKind::Mixed }
fn default_matrix_size() -> usize { 50 }
fn default_array_len() -> usize { 5000 }
fn default_prime_limit() -> usize { 100_000 }
fn default_fixed_cost() -> u64 { 5 }
fn default_fixed_category() -> String { "fixed".to_string() }

impl Default for WorkloadConfig {
    fn default() -> Self {
        Self {
            kind: default_kind(),
            matrix_size: default_matrix_size(),
            array_len: default_array_len(),
            prime_limit: default_prime_limit(),
            fixed_cost_ms: default_fixed_cost(),
            fixed_category: default_fixed_category(),
            seed: None,
        }
    }
}

impl WorkloadConfig {
    /// Fixed-cost workload; `cost` is rounded up to whole milliseconds.
    pub fn fixed(cost: Duration) -> Self {
        Self {
            kind: WorkloadKind::Fixed,
            fixed_cost_ms: ceil_millis(cost),
            ..Self::default()
        }
    }

    /// Build one workload for `spec`.
    pub fn build(&self, spec: &WorkloadSpec) -> Box<dyn Workload> {
        let label = spec.label.clone();
        let threshold = spec.threshold;
        let seed = self.seed.map(|s| s ^ label_seed(&label));
        match self.kind {
            WorkloadKind::Matrix => {
                let w = MatrixMultiply::new(label, threshold, self.matrix_size);
                Box::new(match seed {
                    Some(s) => w.with_seed(s),
                    None => w,
                })
            }
            WorkloadKind::Merge => {
                let w = MergeSort::new(label, threshold, self.array_len);
                Box::new(match seed {
                    Some(s) => w.with_seed(s),
                    None => w,
                })
            }
            WorkloadKind::Primes => Box::new(PrimeSieve::new(label, threshold, self.prime_limit)),
            WorkloadKind::Mixed => {
                let w = MixedProcessor::new(
                    label,
                    threshold,
                    self.matrix_size,
                    self.array_len,
                    self.prime_limit,
                );
                Box::new(match seed {
                    Some(s) => w.with_seed(s),
                    None => w,
                })
            }
            WorkloadKind::Fixed => Box::new(FixedCost::new(
                label,
                threshold,
                self.fixed_category.clone(),
                Duration::from_millis(self.fixed_cost_ms),
            )),
        }
    }

    /// A factory closure over a copy of this config.
    pub fn factory(&self) -> WorkloadFactory {
        let config = self.clone();
        Arc::new(move |spec: &WorkloadSpec| config.build(spec))
    }
}

// Per-task seed offset so seeded tasks don't all draw the same inputs.
fn label_seed(label: &str) -> u64 {
    label
        .bytes()
        .fold(0u64, |acc, b| acc.rotate_left(5) ^ u64::from(b))
}
