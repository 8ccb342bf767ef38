//! Bins for the weighted histogram
//!
//! This module provides the ordered bin storage backing the histogram: a
//! contiguous vector of `(value, weight)` pairs kept strictly ascending by
//! value, with positional insertion, per-tick decay and nearest-neighbour
//! collapsing to hold a bin budget.

use crate::decay::ExponentialDecay;
use std::slice;

/// A single histogram bin
///
/// `value` is the representative point of every observation merged into the
/// bin, `weight` the decayed count attributed to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    /// Representative value of the bin
    pub value: f64,
    /// Decayed number of observations in the bin
    pub weight: f64,
}

impl Bin {
    /// Create a new bin
    pub fn new(value: f64, weight: f64) -> Self {
        Bin { value, weight }
    }

    /// Combine two neighbouring bins into one
    ///
    /// The merged value is the plain midpoint of the two values, not weighted
    /// by mass. Weights are summed.
    pub fn merge(&self, other: &Bin) -> Bin {
        Bin {
            // Halved before adding, finite for any finite pair.
            value: self.value / 2.0 + other.value / 2.0,
            weight: self.weight + other.weight,
        }
    }
}

/// Bins sorted strictly ascending by value
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct Bins {
    bins: Vec<Bin>,
}

impl Bins {
    /// Create an empty set of bins with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Bins {
            bins: Vec::with_capacity(capacity),
        }
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Check if there are no bins
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// View the bins in ascending order
    pub fn as_slice(&self) -> &[Bin] {
        &self.bins
    }

    /// Iterate over the bins in ascending order
    pub fn iter(&self) -> slice::Iter<'_, Bin> {
        self.bins.iter()
    }

    /// Record one observation of `value`
    ///
    /// A bin holding exactly `value` gains one unit of weight, otherwise a new
    /// bin of weight 1 is inserted at its sorted position. Returns the index
    /// of the touched bin.
    ///
    /// `value` must not be NaN.
    pub fn observe(&mut self, value: f64) -> usize {
        let index = self.bins.partition_point(|bin| bin.value < value);

        match self.bins.get_mut(index) {
            Some(bin) if bin.value == value => bin.weight += 1.0,
            _ => self.bins.insert(index, Bin::new(value, 1.0)),
        }

        index
    }

    /// Decay every bin except the one at `except` by one tick
    pub fn decay_except(&mut self, except: usize, decay: &ExponentialDecay) {
        for (i, bin) in self.bins.iter_mut().enumerate() {
            if i != except {
                bin.weight = decay.decay(bin.weight);
            }
        }
    }

    /// Sum of all bin weights
    pub fn total_weight(&self) -> f64 {
        self.bins.iter().map(|bin| bin.weight).sum()
    }

    /// Merge nearest neighbours until at most `max_bins` bins remain
    ///
    /// The adjacent pair with the smallest value difference is merged first;
    /// ties go to the lowest pair. Returns the number of merges performed.
    pub fn collapse(&mut self, max_bins: usize) -> usize {
        let mut merges = 0;

        while self.bins.len() > max_bins.max(1) {
            let (index, delta) = self.closest_pair();
            let merged = self.bins[index - 1].merge(&self.bins[index]);

            tracing::trace!(
                target: "weighted_histogram",
                index,
                delta,
                value = merged.value,
                weight = merged.weight,
                "bins_merged"
            );

            self.bins[index - 1] = merged;
            self.bins.remove(index);
            merges += 1;
        }

        merges
    }

    /// Index `i` of the adjacent pair `(i - 1, i)` with the smallest gap
    ///
    /// Requires at least two bins.
    fn closest_pair(&self) -> (usize, f64) {
        let mut min_index = 1;
        let mut min_delta = self.bins[1].value - self.bins[0].value;

        for i in 2..self.bins.len() {
            let delta = self.bins[i].value - self.bins[i - 1].value;
            if delta < min_delta {
                min_delta = delta;
                min_index = i;
            }
        }

        (min_index, min_delta)
    }

    /// Remove all bins
    pub fn clear(&mut self) {
        self.bins.clear();
    }
}

impl<'a> IntoIterator for &'a Bins {
    type Item = &'a Bin;
    type IntoIter = slice::Iter<'a, Bin>;

    fn into_iter(self) -> Self::IntoIter {
        self.bins.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(bins: &Bins) -> Vec<f64> {
        bins.iter().map(|bin| bin.value).collect()
    }

    #[test]
    fn test_observe_keeps_order() {
        let mut bins = Bins::default();

        assert!(bins.is_empty());
        assert_eq!(bins.observe(5.0), 0);
        assert_eq!(bins.observe(1.0), 0);
        assert_eq!(bins.observe(9.0), 2);
        assert_eq!(bins.observe(3.0), 1);

        assert_eq!(bins.len(), 4);
        assert_eq!(values(&bins), vec![1.0, 3.0, 5.0, 9.0]);
        assert_eq!(bins.total_weight(), 4.0);
    }

    #[test]
    fn test_observe_existing_value() {
        let mut bins = Bins::default();

        bins.observe(2.0);
        bins.observe(4.0);
        assert_eq!(bins.observe(4.0), 1); // Should add to existing

        assert_eq!(bins.len(), 2);
        assert_eq!(bins.as_slice()[1], Bin::new(4.0, 2.0));
        assert_eq!(bins.total_weight(), 3.0);
    }

    #[test]
    fn test_decay_except() {
        let decay = ExponentialDecay::new(0.5).unwrap();
        let mut bins = Bins::default();

        bins.observe(1.0);
        bins.observe(2.0);
        bins.observe(3.0);
        bins.decay_except(1, &decay);

        let weights: Vec<f64> = bins.iter().map(|bin| bin.weight).collect();
        assert_eq!(weights, vec![0.5, 1.0, 0.5]);
    }

    #[test]
    fn test_bin_merge() {
        let merged = Bin::new(1.0, 0.25).merge(&Bin::new(2.0, 0.5));
        assert_eq!(merged, Bin::new(1.5, 0.75));

        // Midpoint ignores the relative mass
        let merged = Bin::new(0.0, 100.0).merge(&Bin::new(10.0, 1.0));
        assert_eq!(merged.value, 5.0);

        let merged = Bin::new(f64::MAX, 1.0).merge(&Bin::new(f64::MAX, 1.0));
        assert!(merged.value.is_finite());
    }

    #[test]
    fn test_collapse_merges_closest_pair() {
        let mut bins = Bins::default();
        for &value in &[1.0, 2.0, 10.0] {
            bins.observe(value);
        }

        assert_eq!(bins.collapse(2), 1);
        assert_eq!(bins.as_slice(), &[Bin::new(1.5, 2.0), Bin::new(10.0, 1.0)]);
        assert_eq!(bins.total_weight(), 3.0);
    }

    #[test]
    fn test_collapse_ties_pick_lowest_pair() {
        let mut bins = Bins::default();
        for &value in &[0.0, 1.0, 2.0, 3.0] {
            bins.observe(value);
        }

        bins.collapse(3);
        assert_eq!(values(&bins), vec![0.5, 2.0, 3.0]);
    }

    #[test]
    fn test_collapse_multiple_merges() {
        let mut bins = Bins::with_capacity(8);
        for &value in &[1.0, 2.0, 4.0, 8.0, 16.0, 32.0] {
            bins.observe(value);
        }

        assert_eq!(bins.collapse(2), 4);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins.total_weight(), 6.0);

        for pair in bins.as_slice().windows(2) {
            assert!(pair[0].value < pair[1].value);
        }
    }

    #[test]
    fn test_collapse_within_budget() {
        let mut bins = Bins::default();
        bins.observe(1.0);
        bins.observe(2.0);

        assert_eq!(bins.collapse(2), 0);
        assert_eq!(bins.collapse(5), 0);
        assert_eq!(bins.len(), 2);

        bins.clear();
        assert!(bins.is_empty());
        assert_eq!(bins.collapse(1), 0);
    }

    #[test]
    fn test_collapse_extreme_values() {
        let mut bins = Bins::default();
        bins.observe(-f64::MAX);
        bins.observe(f64::MAX);

        // The gap overflows to infinity but the pair still merges
        assert_eq!(bins.collapse(1), 1);
        assert_eq!(bins.as_slice(), &[Bin::new(0.0, 2.0)]);
    }
}
