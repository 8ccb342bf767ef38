//! Exponential decay for bin weights
//!
//! This module provides the decay factor that ages histogram bins. Every
//! insertion is one tick; on each tick untouched weights move toward zero by
//! the exponentially weighted moving average rule.

use crate::{HistogramError, Result};

/// Exponential decay with a fixed retained fraction per tick
///
/// An `alpha` close to 1 keeps a long memory, an `alpha` close to 0 forgets
/// almost immediately.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExponentialDecay {
    /// The fraction of an untouched weight retained per tick
    alpha: f64,
}

impl ExponentialDecay {
    /// Create a new decay with the given alpha
    ///
    /// # Arguments
    /// * `alpha` - The retained fraction per tick (strictly between 0 and 1)
    pub fn new(alpha: f64) -> Result<Self> {
        // NaN fails this check.
        if !(alpha > 0.0 && alpha < 1.0) {
            return Err(HistogramError::InvalidAlpha);
        }

        Ok(ExponentialDecay { alpha })
    }

    /// Get the decay factor
    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Move `existing` toward `target` by one tick
    ///
    /// `target * (1 - alpha) + existing * alpha`
    pub fn ewma(&self, existing: f64, target: f64) -> f64 {
        target * (1.0 - self.alpha) + existing * self.alpha
    }

    /// Decay a weight toward zero by one tick
    pub fn decay(&self, weight: f64) -> f64 {
        self.ewma(weight, 0.0)
    }

    /// Number of ticks after which an untouched weight has halved
    pub fn half_life(&self) -> f64 {
        0.5f64.ln() / self.alpha.ln()
    }
}
