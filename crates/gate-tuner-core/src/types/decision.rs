//! Resolved threshold decisions and their trend classification.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single resolved threshold decision for a domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdDecision {
    /// Unique identifier, stamped at construction.
    pub id: Uuid,
    /// When the decision was resolved.
    pub decided_at: DateTime<Utc>,
    /// The threshold that was handed back to the caller.
    pub threshold: f32,
}

impl ThresholdDecision {
    pub fn new(threshold: f32) -> Self {
        Self {
            id: Uuid::new_v4(),
            decided_at: Utc::now(),
            threshold,
        }
    }
}

/// Qualitative direction of recent threshold movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
}

impl TrendDirection {
    pub fn as_str(self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::Stable => "stable",
        }
    }
}
