//! Registry of success definitions for one decision domain.

use serde::{Deserialize, Serialize};

use crate::error::EngineResult;
use crate::types::SuccessDefinition;

/// Holds every registered `SuccessDefinition` for a domain.
///
/// Registration is append-only and deliberately does not de-duplicate:
/// registering the same metric name twice doubles its weight in the
/// statistical optimizer, which lets callers express redundancy on purpose.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequirementRegistry {
    definitions: Vec<SuccessDefinition>,
}

impl RequirementRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a definition. O(1) amortized.
    pub fn register(&mut self, definition: SuccessDefinition) -> EngineResult<()> {
        definition.validate()?;
        self.definitions.push(definition);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    pub fn definitions(&self) -> &[SuccessDefinition] {
        &self.definitions
    }

    /// Total priority weight for a metric name. Duplicate registrations sum,
    /// unknown names weigh zero.
    pub fn priority_weight(&self, metric: &str) -> f32 {
        self.definitions
            .iter()
            .filter(|def| def.name == metric)
            .map(|def| def.priority)
            .sum()
    }

    /// Mean tolerance across all registered definitions, or `None` when the
    /// registry is empty.
    pub fn mean_tolerance(&self) -> Option<f32> {
        if self.definitions.is_empty() {
            return None;
        }
        let sum: f32 = self.definitions.iter().map(|def| def.tolerance).sum();
        Some(sum / self.definitions.len() as f32)
    }
}
