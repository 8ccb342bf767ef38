//! # Weighted Histogram: Streaming Quantiles with Recency
//!
//! This crate provides a bounded-memory histogram for estimating quantiles of
//! an unbounded stream of `f64` observations. Bin weights decay exponentially
//! on every insertion, so recent observations dominate older ones.
//!
//! The histogram is particularly useful for:
//! - Tracking latency percentiles of a live service
//! - Metric aggregation under a fixed memory budget
//! - Any stream where the current distribution matters more than its history
//!
//! ## Example
//!
//! ```
//! use weighted_histogram::WeightedHistogram;
//!
//! let mut histogram = WeightedHistogram::new(64, 0.99).unwrap(); // 64 bins, slow decay
//!
//! // Add values
//! histogram.add(12.5).unwrap();
//! histogram.add(13.0).unwrap();
//! histogram.add(250.0).unwrap();
//!
//! // Get quantiles
//! let median = histogram.quantile(0.5).unwrap();
//! let p99 = histogram.quantile(0.99).unwrap();
//! assert!(median <= p99);
//! ```

mod bins;
pub mod decay;
pub mod histogram;

pub use bins::Bin;
pub use decay::ExponentialDecay;
pub use histogram::WeightedHistogram;

/// Errors that can occur in histogram operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistogramError {
    /// Invalid maximum bin count (must be at least 1)
    InvalidMaxBins,
    /// Invalid decay factor (must be strictly between 0 and 1)
    InvalidAlpha,
    /// Invalid quantile value (must be between 0 and 1)
    InvalidQuantile,
    /// Observation is NaN or infinite
    NonFiniteValue,
    /// Empty histogram (no values added)
    EmptyHistogram,
}

impl HistogramError {
    /// Whether the error was raised while constructing a histogram
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            HistogramError::InvalidMaxBins | HistogramError::InvalidAlpha
        )
    }
}

impl std::fmt::Display for HistogramError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HistogramError::InvalidMaxBins => {
                write!(f, "Maximum bin count must be at least 1")
            }
            HistogramError::InvalidAlpha => {
                write!(f, "Decay factor must be strictly between 0 and 1")
            }
            HistogramError::InvalidQuantile => {
                write!(f, "Quantile must be between 0 and 1")
            }
            HistogramError::NonFiniteValue => {
                write!(f, "Value must be a finite number")
            }
            HistogramError::EmptyHistogram => {
                write!(f, "Cannot compute quantile from empty histogram")
            }
        }
    }
}

impl std::error::Error for HistogramError {}

/// Result type for histogram operations
pub type Result<T> = std::result::Result<T, HistogramError>;
