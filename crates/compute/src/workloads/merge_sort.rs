use std::hint::black_box;
use std::time::Instant;

use rand::rngs::StdRng;
use rand::Rng;
use timeslice_core::{CostTotals, Workload};

use super::{rng_from, Progress};

pub const MERGE_CATEGORY: &str = "merge";

/// Stable top-down merge sort.
pub fn merge_sort(values: &mut [i32]) {
    if values.len() < 2 {
        return;
    }
    let mut scratch = values.to_vec();
    sort_into(&mut scratch, values);
}

// Sorts `dst` using `src` (same contents) as scratch space.
fn sort_into(src: &mut [i32], dst: &mut [i32]) {
    let len = dst.len();
    if len < 2 {
        return;
    }
    let mid = len / 2;
    {
        let (src_lo, src_hi) = src.split_at_mut(mid);
        let (dst_lo, dst_hi) = dst.split_at_mut(mid);
        sort_into(dst_lo, src_lo);
        sort_into(dst_hi, src_hi);
    }
    merge(&src[..mid], &src[mid..], dst);
}

fn merge(left: &[i32], right: &[i32], out: &mut [i32]) {
    let (mut i, mut j) = (0, 0);
    for slot in out.iter_mut() {
        if j >= right.len() || (i < left.len() && left[i] <= right[j]) {
            *slot = left[i];
            i += 1;
        } else {
            *slot = right[j];
            j += 1;
        }
    }
}

/// One unit = generate a random array and merge-sort it.
#[derive(Debug)]
pub struct MergeSort {
    label: String,
    len: usize,
    progress: Progress,
    rng: StdRng,
}

impl MergeSort {
    pub fn new(label: impl Into<String>, threshold: u64, len: usize) -> Self {
        Self {
            label: label.into(),
            len,
            progress: Progress::new(threshold),
            rng: rng_from(None),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = rng_from(Some(seed));
        self
    }
}

pub(crate) fn sort_random(rng: &mut StdRng, len: usize) -> Vec<i32> {
    let mut values: Vec<i32> = (0..len).map(|_| rng.gen_range(0..10_000)).collect();
    merge_sort(&mut values);
    values
}

impl Workload for MergeSort {
    fn label(&self) -> &str {
        &self.label
    }

    fn run_once(&mut self) -> CostTotals {
        if self.progress.is_done() {
            return CostTotals::new();
        }
        let start = Instant::now();
        black_box(sort_random(&mut self.rng, self.len));
        let elapsed = start.elapsed();
        self.progress.advance();
        CostTotals::single(MERGE_CATEGORY, elapsed)
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
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn sorts_small_inputs() {
        let mut empty: [i32; 0] = [];
        merge_sort(&mut empty);

        let mut one = [5];
        merge_sort(&mut one);
        assert_eq!(one, [5]);

        let mut v = [5, -1, 3, 3, 0, 9, 2];
        merge_sort(&mut v);
        assert_eq!(v, [-1, 0, 2, 3, 3, 5, 9]);
    }

    #[test]
    fn matches_std_sort_on_random_input() {
        let mut rng = StdRng::seed_from_u64(3);
        let sorted = sort_random(&mut rng, 5000);

        let mut rng = StdRng::seed_from_u64(3);
        let mut expected: Vec<i32> = (0..5000).map(|_| rng.gen_range(0..10_000)).collect();
        expected.sort();

        assert_eq!(sorted, expected);
    }

    #[test]
    fn reports_merge_category_per_unit() {
        let mut w = MergeSort::new("s", 1, 100).with_seed(9);
        assert_eq!(w.run_once().units(MERGE_CATEGORY), 1);
        assert!(w.is_done());
        assert!(w.run_once().is_empty());
    }
}
