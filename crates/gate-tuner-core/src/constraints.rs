//! Caller-supplied constraints applied after optimization.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use crate::error::{EngineError, EngineResult};

/// Post-processing hook for caller-defined threshold shaping.
///
/// Runs after min/max clamping, so an implementation sees the already
/// range-limited value. Whatever it returns is still clamped to the
/// practical bound before the decision is final, and a non-finite return
/// is discarded in favor of the shaped input, so a strategy cannot push a
/// gate into always-accept or always-reject territory.
pub trait ConstraintStrategy: Send + Sync {
    /// Transform the threshold. `operational_limit` is forwarded verbatim
    /// from the constraint set for strategies that want it.
    fn apply(&self, threshold: f32, operational_limit: Option<f32>) -> f32;
}

impl<F> ConstraintStrategy for F
where
    F: Fn(f32, Option<f32>) -> f32 + Send + Sync,
{
    fn apply(&self, threshold: f32, operational_limit: Option<f32>) -> f32 {
        self(threshold, operational_limit)
    }
}

/// Constraint set for one `determine_optimal_threshold` call.
///
/// Applied in a fixed order: minimum clamp, then maximum clamp, then the
/// custom strategy. A contradictory pair (min above max) is not an error;
/// the ordered application simply lets the later clamp win.
#[derive(Clone, Default)]
pub struct ThresholdConstraints {
    /// Lower clamp for the resolved threshold.
    pub min_threshold: Option<f32>,
    /// Upper clamp for the resolved threshold.
    pub max_threshold: Option<f32>,
    /// Opaque capacity value forwarded to the custom strategy.
    pub operational_limit: Option<f32>,
    /// Caller-defined shaping hook, applied last.
    pub strategy: Option<Arc<dyn ConstraintStrategy>>,
}

impl ThresholdConstraints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_min(mut self, min_threshold: f32) -> Self {
        self.min_threshold = Some(min_threshold);
        self
    }

    pub fn with_max(mut self, max_threshold: f32) -> Self {
        self.max_threshold = Some(max_threshold);
        self
    }

    pub fn with_operational_limit(mut self, limit: f32) -> Self {
        self.operational_limit = Some(limit);
        self
    }

    pub fn with_strategy(mut self, strategy: Arc<dyn ConstraintStrategy>) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Validate numeric fields, naming the offending field on failure.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(min) = self.min_threshold {
            if !min.is_finite() || !(0.0..=1.0).contains(&min) {
                return Err(EngineError::ValidationError {
                    field: "min_threshold".to_string(),
                    message: format!("must be within [0.0, 1.0], got {min}"),
                });
            }
        }
        if let Some(max) = self.max_threshold {
            if !max.is_finite() || !(0.0..=1.0).contains(&max) {
                return Err(EngineError::ValidationError {
                    field: "max_threshold".to_string(),
                    message: format!("must be within [0.0, 1.0], got {max}"),
                });
            }
        }
        if let Some(limit) = self.operational_limit {
            if !limit.is_finite() {
                return Err(EngineError::ValidationError {
                    field: "operational_limit".to_string(),
                    message: "must be a finite number".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Apply the constraint chain to a resolved threshold. Non-finite
    /// strategy output is discarded and the min/max-shaped value stands.
    pub fn apply(&self, threshold: f32) -> f32 {
        let mut value = threshold;
        if let Some(min) = self.min_threshold {
            value = value.max(min);
        }
        if let Some(max) = self.max_threshold {
            value = value.min(max);
        }
        if let Some(strategy) = &self.strategy {
            let adjusted = strategy.apply(value, self.operational_limit);
            if adjusted.is_finite() {
                value = adjusted;
            } else {
                warn!(
                    adjusted,
                    "constraint strategy returned a non-finite threshold, keeping the shaped value"
                );
            }
        }
        value
    }
}

impl fmt::Debug for ThresholdConstraints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThresholdConstraints")
            .field("min_threshold", &self.min_threshold)
            .field("max_threshold", &self.max_threshold)
            .field("operational_limit", &self.operational_limit)
            .field("strategy", &self.strategy.is_some())
            .finish()
    }
}
