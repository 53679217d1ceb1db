//! Frequency counting shared by the statistics modules.
//!
//! All "most common" statistics go through [`ValueCounts::mode`], which
//! breaks ties deterministically: highest count first, then the smallest
//! value in its natural order.

use std::collections::BTreeMap;

use bikeshare_core::error::{BikeshareError, Result};
use bikeshare_core::models::CategoryCount;
use serde::Serialize;

// ── Mode ──────────────────────────────────────────────────────────────────────

/// The most frequent value of a column and how often it occurs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Mode<T> {
    pub value: T,
    pub count: usize,
}

// ── ValueCounts ───────────────────────────────────────────────────────────────

/// Occurrence counts per distinct value, kept in ascending value order.
#[derive(Debug, Clone)]
pub struct ValueCounts<K> {
    counts: BTreeMap<K, usize>,
    total: usize,
}

impl<K: Ord> Default for ValueCounts<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<K: Ord> ValueCounts<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `value`.
    pub fn add(&mut self, value: K) {
        *self.counts.entry(value).or_insert(0) += 1;
        self.total += 1;
    }

    /// Number of observations counted.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Smallest value counted.
    pub fn min_value(&self) -> Option<&K> {
        self.counts.keys().next()
    }

    /// Largest value counted.
    pub fn max_value(&self) -> Option<&K> {
        self.counts.keys().next_back()
    }

    /// The most frequent value; among equally frequent values the smallest.
    ///
    /// Returns `None` when nothing was counted.
    pub fn mode(&self) -> Option<(&K, usize)> {
        let mut best: Option<(&K, usize)> = None;
        // Ascending key order: a later key only wins with a strictly higher count.
        for (value, &count) in &self.counts {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((value, count));
            }
        }
        best
    }

    /// All values ordered by count descending, then value ascending.
    pub fn sorted(&self) -> Vec<(&K, usize)> {
        let mut entries: Vec<(&K, usize)> = self.counts.iter().map(|(k, &c)| (k, c)).collect();
        // Stable sort keeps ascending key order among equal counts.
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

impl<K: Ord + Clone> ValueCounts<K> {
    /// Owned [`Mode`], or `EmptyInput` naming `statistic` when nothing was
    /// counted.
    pub fn require_mode(&self, statistic: &'static str) -> Result<Mode<K>> {
        self.mode()
            .map(|(value, count)| Mode {
                value: value.clone(),
                count,
            })
            .ok_or(BikeshareError::EmptyInput { statistic })
    }
}

impl<K: Ord + ToString> ValueCounts<K> {
    /// Counts as display-ready categories in [`ValueCounts::sorted`] order.
    pub fn to_categories(&self) -> Vec<CategoryCount> {
        self.sorted()
            .into_iter()
            .map(|(value, count)| CategoryCount {
                value: value.to_string(),
                count,
            })
            .collect()
    }
}

impl<K: Ord> FromIterator<K> for ValueCounts<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut counts = ValueCounts::new();
        for value in iter {
            counts.add(value);
        }
        counts
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
