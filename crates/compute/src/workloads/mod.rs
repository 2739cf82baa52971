//! Concrete CPU-bound workloads.
//!
//! Each workload owns its own progress counter and reports the cost of every
//! unit under a named category. [`WorkloadConfig`] selects and parameterizes
//! one of them for the harness.

mod config;
mod fixed;
mod matrix;
mod merge_sort;
mod mixed;
mod sieve;

pub use config::{WorkloadConfig, WorkloadFactory, WorkloadKind};
pub use fixed::FixedCost;
pub use matrix::{multiply_random, MatrixMultiply, MATRIX_CATEGORY};
pub use merge_sort::{merge_sort, MergeSort, MERGE_CATEGORY};
pub use mixed::MixedProcessor;
pub use sieve::{count_primes, PrimeSieve, PRIMES_CATEGORY};

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Completed-unit counter with a completion threshold. Each workload owns one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Progress {
    completed: u64,
    threshold: u64,
}

impl Progress {
    pub(crate) fn new(threshold: u64) -> Self {
        Self { completed: 0, threshold }
    }

    pub(crate) fn is_done(&self) -> bool {
        self.completed >= self.threshold
    }

    pub(crate) fn advance(&mut self) {
        self.completed += 1;
    }

    pub(crate) fn completed(&self) -> u64 {
        self.completed
    }
}

pub(crate) fn rng_from(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
