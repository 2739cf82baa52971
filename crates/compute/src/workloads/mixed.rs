use std::hint::black_box;
use std::time::Instant;

use rand::rngs::StdRng;
use timeslice_core::{CostTotals, Workload};

use super::matrix::{multiply_random, MATRIX_CATEGORY};
use super::merge_sort::{sort_random, MERGE_CATEGORY};
use super::sieve::{count_primes, PRIMES_CATEGORY};
use super::{rng_from, Progress};

/// One unit = a matrix multiplication, a merge sort and a prime sieve,
/// each timed under its own category.
#[derive(Debug)]
pub struct MixedProcessor {
    label: String,
    matrix_size: usize,
    array_len: usize,
    prime_limit: usize,
    progress: Progress,
    rng: StdRng,
}

impl MixedProcessor {
    pub fn new(
        label: impl Into<String>,
        threshold: u64,
        matrix_size: usize,
        array_len: usize,
        prime_limit: usize,
    ) -> Self {
        Self {
            label: label.into(),
            matrix_size,
            array_len,
            prime_limit,
            progress: Progress::new(threshold),
            rng: rng_from(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = rng_from(Some(seed));
        self
    }
}

impl Workload for MixedProcessor {
    fn label(&self) -> &str {
        &self.label
    }

    fn run_once(&mut self) -> CostTotals {
        let mut totals = CostTotals::new();
        if self.progress.is_done() {
            return totals;
        }

        let start = Instant::now();
        black_box(multiply_random(&mut self.rng, self.matrix_size));
        totals.record(MATRIX_CATEGORY, start.elapsed());

        let start = Instant::now();
        black_box(sort_random(&mut self.rng, self.array_len));
        totals.record(MERGE_CATEGORY, start.elapsed());

        let start = Instant::now();
        black_box(count_primes(black_box(self.prime_limit)));
        totals.record(PRIMES_CATEGORY, start.elapsed());

        self.progress.advance();
        totals
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
    fn each_unit_touches_all_three_categories() {
        let mut w = MixedProcessor::new("mixed", 2, 4, 50, 200).with_seed(5);
        let delta = w.run_once();
        let categories: Vec<&str> = delta.categories().collect();
        assert_eq!(categories, vec![MATRIX_CATEGORY, MERGE_CATEGORY, PRIMES_CATEGORY]);
        assert_eq!(delta.total_units(), 3);

        w.run_once();
        assert!(w.is_done());
        assert!(w.run_once().is_empty());
        assert_eq!(w.progress(), 2);
    }
}
