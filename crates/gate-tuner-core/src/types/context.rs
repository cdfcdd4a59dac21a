//! Caller-supplied decision context.

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Hints consulted when a domain has no outcome history yet.
///
/// On the cold-start path the resolver prefers `initial_threshold` (used
/// verbatim), then `criticality` (mapped linearly to a starting threshold),
/// then falls back to the configured neutral constant. Once history exists
/// the optimizers take over and these hints are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecisionContext {
    /// Explicit starting threshold for a new domain.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_threshold: Option<f32>,
    /// Business criticality of the domain, in [0.0, 1.0]. Higher criticality
    /// starts the gate stricter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criticality: Option<f32>,
}

impl DecisionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initial_threshold(mut self, threshold: f32) -> Self {
        self.initial_threshold = Some(threshold);
        self
    }

    pub fn with_criticality(mut self, criticality: f32) -> Self {
        self.criticality = Some(criticality);
        self
    }

    /// Validate hint ranges, naming the offending field on failure.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(threshold) = self.initial_threshold {
            if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
                return Err(EngineError::ValidationError {
                    field: "initial_threshold".to_string(),
                    message: format!("must be within [0.0, 1.0], got {threshold}"),
                });
            }
        }
        if let Some(criticality) = self.criticality {
            if !criticality.is_finite() || !(0.0..=1.0).contains(&criticality) {
                return Err(EngineError::ValidationError {
                    field: "criticality".to_string(),
                    message: format!("must be within [0.0, 1.0], got {criticality}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_context_is_valid() {
        assert!(DecisionContext::new().validate().is_ok());
        println!("[PASS] empty context validates");
    }

    #[test]
    fn test_criticality_out_of_range_rejected() {
        let context = DecisionContext::new().with_criticality(2.0);
        let err = context.validate().unwrap_err();
        match err {
            EngineError::ValidationError { field, .. } => assert_eq!(field, "criticality"),
            other => panic!("unexpected error: {other}"),
        }
        println!("[PASS] criticality above 1.0 is rejected");
    }

    #[test]
    fn test_initial_threshold_nan_rejected() {
        let context = DecisionContext::new().with_initial_threshold(f32::NAN);
        assert!(context.validate().is_err());
        println!("[PASS] NaN initial threshold is rejected");
    }
}
