//! Core weighted histogram implementation
//!
//! This module provides the main `WeightedHistogram` data structure with
//! methods for adding values and querying quantiles and summary statistics.
//!
//! Each call to [`WeightedHistogram::add`] is one tick of time: the bin that
//! receives the observation gains a fresh unit of weight while every other
//! bin decays by `alpha`. When the bin budget is exceeded the two bins closest
//! in value are merged.
//!
//! The histogram has no internal synchronization. Callers sharing one across
//! threads must serialize access, e.g. behind a `Mutex`.

use crate::bins::{Bin, Bins};
use crate::decay::ExponentialDecay;
use crate::{HistogramError, Result};
use std::fmt;

/// Width of the bar printed for a bin holding all of the weight
const DISPLAY_BAR_WIDTH: f64 = 200.0;

/// A histogram of exponentially decaying bins
///
/// The histogram approximates quantiles of a stream with recency factored in,
/// using at most `max_bins` bins regardless of how many values are added.
#[derive(Debug, Clone)]
pub struct WeightedHistogram {
    /// Bins sorted ascending by value
    bins: Bins,

    /// The bin budget
    max_bins: usize,

    /// Decay applied to untouched bins on every insertion
    decay: ExponentialDecay,

    /// Sum of all bin weights, refreshed on every insertion
    total_weight: f64,
}

impl WeightedHistogram {
    /// Create a new histogram
    ///
    /// # Arguments
    /// * `max_bins` - The maximum number of bins to maintain (at least 1)
    /// * `alpha` - The decay factor (strictly between 0 and 1)
    ///
    /// # Returns
    /// A new, empty histogram
    pub fn new(max_bins: usize, alpha: f64) -> Result<Self> {
        if max_bins == 0 {
            return Err(HistogramError::InvalidMaxBins);
        }
        let decay = ExponentialDecay::new(alpha)?;

        tracing::debug!(
            target: "weighted_histogram",
            max_bins,
            alpha,
            half_life = decay.half_life(),
            "histogram_created"
        );

        Ok(WeightedHistogram {
            // One extra slot for the bin that briefly exceeds the budget.
            bins: Bins::with_capacity(max_bins.saturating_add(1)),
            max_bins,
            decay,
            total_weight: 0.0,
        })
    }

    /// Add a value to the histogram
    ///
    /// # Arguments
    /// * `value` - The value to add (must be finite)
    pub fn add(&mut self, value: f64) -> Result<()> {
        if !value.is_finite() {
            tracing::debug!(target: "weighted_histogram", value, "non_finite_value_rejected");
            return Err(HistogramError::NonFiniteValue);
        }

        let touched = self.bins.observe(value);
        self.bins.decay_except(touched, &self.decay);
        self.trim();

        Ok(())
    }

    /// Refresh the total and enforce the bin budget
    fn trim(&mut self) {
        self.total_weight = self.bins.total_weight();
        self.bins.collapse(self.max_bins);
    }

    /// Get the value at a given quantile
    ///
    /// Returns the value of the first bin at which the weight accumulated from
    /// the bottom reaches `quantile * total_weight`. No interpolation is done
    /// between bins.
    ///
    /// # Arguments
    /// * `quantile` - The quantile to query (between 0 and 1)
    pub fn quantile(&self, quantile: f64) -> Result<f64> {
        if !(0.0..=1.0).contains(&quantile) {
            return Err(HistogramError::InvalidQuantile);
        }

        let last = self
            .bins
            .as_slice()
            .last()
            .ok_or(HistogramError::EmptyHistogram)?;

        let mut count = quantile * self.total_weight;
        for bin in &self.bins {
            count -= bin.weight;
            if count <= 0.0 {
                return Ok(bin.value);
            }
        }

        // Rounding left a sliver of weight above the largest bin.
        Ok(last.value)
    }

    /// Get values for multiple quantiles
    ///
    /// # Arguments
    /// * `quantiles` - A slice of quantiles to query
    pub fn quantiles(&self, quantiles: &[f64]) -> Result<Vec<f64>> {
        quantiles.iter().map(|&q| self.quantile(q)).collect()
    }

    /// Fraction of the total weight held by bins with a value at or below `x`
    pub fn cdf(&self, x: f64) -> Result<f64> {
        if x.is_nan() {
            return Err(HistogramError::NonFiniteValue);
        }
        if self.is_empty() {
            return Err(HistogramError::EmptyHistogram);
        }

        let below: f64 = self
            .bins
            .iter()
            .take_while(|bin| bin.value <= x)
            .map(|bin| bin.weight)
            .sum();

        Ok(below / self.total_weight)
    }

    /// Weighted mean of the bin values
    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            return None;
        }

        let sum: f64 = self.bins.iter().map(|bin| bin.value * bin.weight).sum();
        Some(sum / self.total_weight)
    }

    /// Weighted population variance of the bin values
    pub fn variance(&self) -> Option<f64> {
        let mean = self.mean()?;

        let sum: f64 = self
            .bins
            .iter()
            .map(|bin| bin.weight * (bin.value - mean) * (bin.value - mean))
            .sum();
        Some(sum / self.total_weight)
    }

    /// Get the decayed total weight
    pub fn total_weight(&self) -> f64 {
        self.total_weight
    }

    /// Get the current bins in ascending order
    ///
    /// This read-only view is the only access to the bins; the storage and
    /// its trim step stay internal.
    ///
    /// ```compile_fail
    /// use weighted_histogram::bins::Bins;
    /// ```
    pub fn bins(&self) -> &[Bin] {
        self.bins.as_slice()
    }

    /// Number of bins currently held
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Check if the histogram is empty
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Get the bin budget
    pub fn max_bins(&self) -> usize {
        self.max_bins
    }

    /// Get the decay factor
    pub fn alpha(&self) -> f64 {
        self.decay.alpha()
    }

    /// Clear all data from the histogram
    pub fn clear(&mut self) {
        self.bins.clear();
        self.total_weight = 0.0;
    }
}

impl fmt::Display for WeightedHistogram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total: {}", self.total_weight)?;

        for bin in &self.bins {
            let dots = (bin.weight / self.total_weight * DISPLAY_BAR_WIDTH) as usize;
            writeln!(f, "{}\t{}", bin.value, ".".repeat(dots))?;
        }

        Ok(())
    }
}
