use std::hint::black_box;
use std::time::Instant;

use timeslice_core::{CostTotals, Workload};

use super::Progress;

pub const PRIMES_CATEGORY: &str = "primes";

/// Count primes `<= limit` with the sieve of Eratosthenes.
pub fn count_primes(limit: usize) -> usize {
    if limit < 2 {
        return 0;
    }
    let mut is_prime = vec![true; limit + 1];
    is_prime[0] = false;
    is_prime[1] = false;

    let mut p = 2;
    while p * p <= limit {
        if is_prime[p] {
            for multiple in (p * p..=limit).step_by(p) {
                is_prime[multiple] = false;
            }
        }
        p += 1;
    }

    is_prime.iter().filter(|&&b| b).count()
}

/// One unit = one full sieve up to `limit`.
#[derive(Debug, Clone)]
pub struct PrimeSieve {
    label: String,
    limit: usize,
    progress: Progress,
}

impl PrimeSieve {
    pub fn new(label: impl Into<String>, threshold: u64, limit: usize) -> Self {
        Self {
            label: label.into(),
            limit,
            progress: Progress::new(threshold),
        }
    }
}

impl Workload for PrimeSieve {
    fn label(&self) -> &str {
        &self.label
    }

    fn run_once(&mut self) -> CostTotals {
        if self.progress.is_done() {
            return CostTotals::new();
        }
        let start = Instant::now();
        black_box(count_primes(black_box(self.limit)));
        let elapsed = start.elapsed();
        self.progress.advance();
        CostTotals::single(PRIMES_CATEGORY, elapsed)
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
    fn known_prime_counts() {
        assert_eq!(count_primes(0), 0);
        assert_eq!(count_primes(1), 0);
        assert_eq!(count_primes(2), 1);
        assert_eq!(count_primes(100), 25);
        assert_eq!(count_primes(100_000), 9592);
    }

    #[test]
    fn reports_primes_category_per_unit() {
        let mut w = PrimeSieve::new("p", 3, 1000);
        for _ in 0..3 {
            assert_eq!(w.run_once().units(PRIMES_CATEGORY), 1);
        }
        assert!(w.is_done());
        assert_eq!(w.progress(), 3);
    }
}
