//! Priority-weighted statistical threshold optimization.

use tracing::debug;

use crate::config::{PracticalBounds, StatisticalConfig};
use crate::registry::RequirementRegistry;
use crate::types::OutcomeRecord;

/// Derives a threshold target from recent business-metric values.
///
/// Each metric sample is weighted by the total registered priority of its
/// name; with an empty registry every sample weighs the same. The weighted
/// mean is then discounted by the mean tolerance across definitions, so
/// lenient requirements settle on lower thresholds.
///
/// With fewer qualifying observations than the configured minimum the
/// optimizer does not guess: it averages the last few thresholds actually
/// used, or hands back the current threshold when there is nothing at all.
#[derive(Debug, Clone, Default)]
pub struct StatisticalOptimizer {
    config: StatisticalConfig,
    bounds: PracticalBounds,
}

impl StatisticalOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: StatisticalConfig, bounds: PracticalBounds) -> Self {
        Self { config, bounds }
    }

    pub fn config(&self) -> &StatisticalConfig {
        &self.config
    }

    /// Resolve a threshold target from `records` (chronological, oldest
    /// first). Never fails; sparse data routes through the fallback.
    pub fn optimize(
        &self,
        records: &[&OutcomeRecord],
        registry: &RequirementRegistry,
        current_threshold: f32,
    ) -> f32 {
        let start = records.len().saturating_sub(self.config.recent_window);
        let window = &records[start..];

        let mut weighted_sum = 0.0f32;
        let mut weight_total = 0.0f32;
        let mut qualifying = 0usize;

        for record in window {
            let mut contributed = false;
            for (name, value) in &record.metrics {
                let weight = if registry.is_empty() {
                    1.0
                } else {
                    registry.priority_weight(name)
                };
                if weight > 0.0 {
                    weighted_sum += value * weight;
                    weight_total += weight;
                    contributed = true;
                }
            }
            if contributed {
                qualifying += 1;
            }
        }

        if qualifying < self.config.min_observations || weight_total <= f32::EPSILON {
            let fallback = self.sparse_fallback(records, current_threshold);
            debug!(
                qualifying,
                min_observations = self.config.min_observations,
                fallback,
                "sparse outcome data, averaging recent thresholds"
            );
            return fallback;
        }

        let weighted_mean = weighted_sum / weight_total;
        let tolerance = registry.mean_tolerance().unwrap_or(0.0);
        let target = self.bounds.clamp(weighted_mean * (1.0 - tolerance));
        debug!(
            qualifying,
            weighted_mean, tolerance, target, "statistical target resolved"
        );
        target
    }

    fn sparse_fallback(&self, records: &[&OutcomeRecord], current_threshold: f32) -> f32 {
        let start = records.len().saturating_sub(self.config.fallback_window);
        let tail = &records[start..];
        if tail.is_empty() {
            return current_threshold;
        }
        let sum: f32 = tail.iter().map(|record| record.threshold_used).sum();
        sum / tail.len() as f32
    }
}
