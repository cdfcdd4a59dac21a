//! Caller-supplied definitions of business success.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Describes one business success metric for a decision domain.
///
/// The engine never interprets `measurement`, `success_threshold`, or
/// `failure_cost`; they carry caller semantics and travel with the
/// definition. Only `priority` and `tolerance` influence optimization:
/// priority weights a metric's samples in the statistical optimizer, and
/// tolerance relaxes the optimized threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuccessDefinition {
    /// Metric name, matched against the keys of `OutcomeRecord::metrics`.
    pub name: String,
    /// How the caller measures this metric. Descriptive only.
    pub measurement: String,
    /// Metric value the caller considers a success. Caller semantics only.
    pub success_threshold: f32,
    /// Cost the caller attributes to missing this metric. Caller semantics only.
    pub failure_cost: f32,
    /// Weight of this metric in the statistical optimizer, in [0.0, 1.0].
    pub priority: f32,
    /// How much slack the caller accepts, in [0.0, 1.0]. Higher tolerance
    /// lowers the optimized threshold.
    pub tolerance: f32,
}

impl SuccessDefinition {
    pub fn new(
        name: impl Into<String>,
        measurement: impl Into<String>,
        success_threshold: f32,
        failure_cost: f32,
        priority: f32,
        tolerance: f32,
    ) -> Self {
        Self {
            name: name.into(),
            measurement: measurement.into(),
            success_threshold,
            failure_cost,
            priority,
            tolerance,
        }
    }

    /// Validate `priority` and `tolerance` ranges, naming the offending
    /// field on failure. The caller-semantic fields (`name`, `measurement`,
    /// `success_threshold`, `failure_cost`) are accepted as-is.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.priority.is_finite() || !(0.0..=1.0).contains(&self.priority) {
            return Err(EngineError::ValidationError {
                field: "priority".to_string(),
                message: format!("must be within [0.0, 1.0], got {}", self.priority),
            });
        }
        if !self.tolerance.is_finite() || !(0.0..=1.0).contains(&self.tolerance) {
            return Err(EngineError::ValidationError {
                field: "tolerance".to_string(),
                message: format!("must be within [0.0, 1.0], got {}", self.tolerance),
            });
        }
        Ok(())
    }
}
