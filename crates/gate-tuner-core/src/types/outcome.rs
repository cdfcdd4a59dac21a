//! Recorded outcomes of past gate decisions.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};

/// One completed operation and its observed business outcome.
///
/// `metrics` carries named business scores (keys matched against registered
/// `SuccessDefinition` names). The optional `success` flag is a separate
/// signal: correlation analysis only counts records that carry it, while the
/// numeric metrics feed the optimizers whether or not the flag is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeRecord {
    /// Unique identifier, stamped at construction.
    pub id: Uuid,
    /// When the outcome resolved.
    pub recorded_at: DateTime<Utc>,
    /// Threshold that was in effect when the operation was admitted.
    pub threshold_used: f32,
    /// Named business metric values observed for the operation.
    #[serde(default)]
    pub metrics: HashMap<String, f32>,
    /// Whether the caller judged the operation a success overall.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Operational cost the caller attributes to the operation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f32>,
    /// Free-text caller annotation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl OutcomeRecord {
    /// Create a record for an operation admitted at `threshold_used`,
    /// stamped with a fresh id and the current time.
    pub fn new(threshold_used: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            threshold_used,
            metrics: HashMap::new(),
            success: None,
            cost: None,
            note: None,
        }
    }

    pub fn with_metric(mut self, name: impl Into<String>, value: f32) -> Self {
        self.metrics.insert(name.into(), value);
        self
    }

    pub fn with_success(mut self, success: bool) -> Self {
        self.success = Some(success);
        self
    }

    pub fn with_cost(mut self, cost: f32) -> Self {
        self.cost = Some(cost);
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Override the resolution timestamp, e.g. for backfilled outcomes.
    pub fn with_timestamp(mut self, recorded_at: DateTime<Utc>) -> Self {
        self.recorded_at = recorded_at;
        self
    }

    /// Mean of the record's metric values, or `None` when no metrics were
    /// reported. This is the business-impact score the trend optimizer
    /// consumes.
    pub fn impact_score(&self) -> Option<f32> {
        if self.metrics.is_empty() {
            return None;
        }
        let sum: f32 = self.metrics.values().sum();
        Some(sum / self.metrics.len() as f32)
    }

    /// Validate numeric fields, naming the offending field on failure.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.threshold_used.is_finite() || !(0.0..=1.0).contains(&self.threshold_used) {
            return Err(EngineError::ValidationError {
                field: "threshold_used".to_string(),
                message: format!("must be within [0.0, 1.0], got {}", self.threshold_used),
            });
        }
        for (name, value) in &self.metrics {
            if !value.is_finite() {
                return Err(EngineError::ValidationError {
                    field: format!("metrics.{name}"),
                    message: "must be a finite number".to_string(),
                });
            }
        }
        if let Some(cost) = self.cost {
            if !cost.is_finite() {
                return Err(EngineError::ValidationError {
                    field: "cost".to_string(),
                    message: "must be a finite number".to_string(),
                });
            }
        }
        Ok(())
    }
}
