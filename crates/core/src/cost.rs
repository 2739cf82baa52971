use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Cost recorded against a single category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCost {
    /// Summed elapsed time of every unit that touched this category.
    pub elapsed: Duration,
    /// Number of units of work that contributed.
    pub units: u64,
}

impl CategoryCost {
    fn absorb(&mut self, other: &CategoryCost) {
        self.elapsed += other.elapsed;
        self.units += other.units;
    }
}

/// Mapping from a named cost category to its cumulative cost.
///
/// Totals only grow: there is no way to subtract or reset a category.
/// Categories iterate in name order so reports are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CostTotals {
    categories: BTreeMap<String, CategoryCost>,
}

impl CostTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals for a single unit of work that touched one category.
    pub fn single(category: impl Into<String>, elapsed: Duration) -> Self {
        let mut totals = Self::new();
        totals.record(category, elapsed);
        totals
    }

    /// Record one unit of work against `category`.
    pub fn record(&mut self, category: impl Into<String>, elapsed: Duration) {
        let entry = self.categories.entry(category.into()).or_default();
        entry.elapsed += elapsed;
        entry.units += 1;
    }

    /// Fold `other` into `self`, category by category.
    pub fn merge(&mut self, other: &CostTotals) {
        for (category, cost) in &other.categories {
            self.categories
                .entry(category.clone())
                .or_default()
                .absorb(cost);
        }
    }

    /// Sum a collection of totals (e.g. one per parallel worker).
    pub fn sum<'a>(parts: impl IntoIterator<Item = &'a CostTotals>) -> Self {
        let mut totals = Self::new();
        for part in parts {
            totals.merge(part);
        }
        totals
    }

    pub fn get(&self, category: &str) -> Option<&CategoryCost> {
        self.categories.get(category)
    }

    /// Elapsed time for `category`, zero when it was never recorded.
    pub fn elapsed(&self, category: &str) -> Duration {
        self.get(category).map_or(Duration::ZERO, |c| c.elapsed)
    }

    /// Units recorded for `category`, zero when it was never recorded.
    pub fn units(&self, category: &str) -> u64 {
        self.get(category).map_or(0, |c| c.units)
    }

    pub fn total_elapsed(&self) -> Duration {
        self.categories.values().map(|c| c.elapsed).sum()
    }

    pub fn total_units(&self) -> u64 {
        self.categories.values().map(|c| c.units).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryCost)> {
        self.categories.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a CostTotals {
    type Item = (&'a String, &'a CategoryCost);
    type IntoIter = std::collections::btree_map::Iter<'a, String, CategoryCost>;

    fn into_iter(self) -> Self::IntoIter {
        self.categories.iter()
    }
}
