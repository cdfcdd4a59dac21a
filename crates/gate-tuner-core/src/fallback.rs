//! Cold-start threshold resolution.

use tracing::warn;

use crate::config::FallbackConfig;
use crate::types::DecisionContext;

/// Base of the criticality-to-threshold mapping.
pub const CRITICALITY_BASE: f32 = 0.5;
/// Span of the criticality-to-threshold mapping.
pub const CRITICALITY_SPAN: f32 = 0.3;

/// Supplies a starting threshold for a domain with no outcome history.
///
/// Hints are consulted in a fixed order, first match wins:
/// 1. an explicit `initial_threshold`, used verbatim;
/// 2. a `criticality` score, mapped linearly so criticality 0.0 starts at
///    0.5 and criticality 1.0 starts at 0.8 (stricter gates for more
///    critical domains);
/// 3. the configured neutral constant, with a warning event so operators
///    can spot gates running without any guidance.
#[derive(Debug, Clone, Default)]
pub struct FallbackResolver {
    config: FallbackConfig,
}

impl FallbackResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: FallbackConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FallbackConfig {
        &self.config
    }

    /// Resolve a starting threshold from caller hints.
    pub fn resolve(&self, domain: &str, context: &DecisionContext) -> f32 {
        if let Some(initial) = context.initial_threshold {
            return initial;
        }
        if let Some(criticality) = context.criticality {
            return CRITICALITY_BASE + CRITICALITY_SPAN * criticality;
        }
        warn!(
            domain,
            neutral = self.config.neutral_threshold,
            "no outcome history and no caller guidance, using neutral threshold"
        );
        self.config.neutral_threshold
    }
}
