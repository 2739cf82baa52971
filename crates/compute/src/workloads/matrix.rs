use std::hint::black_box;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::Rng;
use timeslice_core::{CostTotals, Workload};

use super::{rng_from, Progress};

pub const MATRIX_CATEGORY: &str = "matrix";

/// Multiply two random `n×n` matrices with entries in `0..10`.
///
/// Returns the trace of the product.
pub fn multiply_random(rng: &mut StdRng, n: usize) -> i64 {
    let a: Vec<i64> = (0..n * n).map(|_| rng.gen_range(0..10)).collect();
    let b: Vec<i64> = (0..n * n).map(|_| rng.gen_range(0..10)).collect();
    let mut c = vec![0i64; n * n];

    for i in 0..n {
        for k in 0..n {
            let aik = a[i * n + k];
            for j in 0..n {
                c[i * n + j] += aik * b[k * n + j];
            }
        }
    }

    (0..n).map(|i| c[i * n + i]).sum()
}

/// One unit = one dense matrix multiplication.
#[derive(Debug)]
pub struct MatrixMultiply {
    label: String,
    size: usize,
    progress: Progress,
    rng: StdRng,
}

impl MatrixMultiply {
    pub fn new(label: impl Into<String>, threshold: u64, size: usize) -> Self {
        Self {
            label: label.into(),
            size,
            progress: Progress::new(threshold),
            rng: rng_from(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = rng_from(Some(seed));
        self
    }
}

impl Workload for MatrixMultiply {
    fn label(&self) -> &str {
        &self.label
    }

    fn run_once(&mut self) -> CostTotals {
        if self.progress.is_done() {
            return CostTotals::new();
        }
        let start = Instant::now();
        black_box(multiply_random(&mut self.rng, self.size));
        let elapsed = start.elapsed();
        self.progress.advance();
        CostTotals::single(MATRIX_CATEGORY, elapsed)
    }

    fn is_done(&self) -> bool {
        self.progress.is_done()
    }

    fn progress(&self) -> u64 {
        self.progress.completed()
    }
}
