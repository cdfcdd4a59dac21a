//! Strategy blending.

use tracing::debug;

use crate::config::{BlendWeights, PracticalBounds};

/// Folds the two strategy outputs into one bounded threshold via a
/// weighted average. Weights are relative; they are normalized by their
/// sum, so `{0.6, 0.4}` and `{3.0, 2.0}` blend identically.
#[derive(Debug, Clone, Default)]
pub struct StrategyCombiner {
    weights: BlendWeights,
    bounds: PracticalBounds,
}

impl StrategyCombiner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: BlendWeights, bounds: PracticalBounds) -> Self {
        Self { weights, bounds }
    }

    pub fn weights(&self) -> &BlendWeights {
        &self.weights
    }

    /// Blend the statistical and trend outputs, clamped to the practical
    /// bound. A degenerate zero weight sum degrades to a plain average
    /// rather than dividing by zero.
    pub fn combine(&self, statistical: f32, trend: f32) -> f32 {
        let total = self.weights.statistical + self.weights.trend;
        let blended = if total <= f32::EPSILON {
            (statistical + trend) / 2.0
        } else {
            (statistical * self.weights.statistical + trend * self.weights.trend) / total
        };
        let bounded = self.bounds.clamp(blended);
        debug!(statistical, trend, bounded, "strategy outputs blended");
        bounded
    }
}
