//! Engine facade: per-domain state and the decision pipeline.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::constraints::ThresholdConstraints;
use crate::correlation::{overall_success_rate, CorrelationAnalyzer};
use crate::error::EngineResult;
use crate::fallback::FallbackResolver;
use crate::journal::OutcomeJournal;
use crate::optimizer::{OutcomeTrendOptimizer, StatisticalOptimizer, StrategyCombiner};
use crate::recommend::RecommendationReport;
use crate::recorder::{DecisionRecorder, ThresholdTrendReport};
use crate::registry::RequirementRegistry;
use crate::types::{DecisionContext, OutcomeRecord, SuccessDefinition, ThresholdDecision};

#[cfg(test)]
mod tests;

/// Mutable state for one decision domain.
#[derive(Debug, Serialize, Deserialize)]
struct DomainState {
    registry: RequirementRegistry,
    journal: OutcomeJournal,
    recorder: DecisionRecorder,
}

impl DomainState {
    fn new(config: &EngineConfig) -> Self {
        Self {
            registry: RequirementRegistry::new(),
            journal: OutcomeJournal::with_retention(config.retention),
            recorder: DecisionRecorder::with_retention(config.retention),
        }
    }
}

/// Adaptive threshold engine.
///
/// Owns per-domain state behind a two-level lock: a map lock for domain
/// lookup and one lock per domain for its state. Calls touching the same
/// domain serialize; different domains proceed in parallel. Every method
/// takes `&self`, so one engine instance can be shared across threads
/// directly or behind an `Arc`.
#[derive(Debug)]
pub struct AdaptiveThresholdEngine {
    config: EngineConfig,
    analyzer: CorrelationAnalyzer,
    statistical: StatisticalOptimizer,
    trend: OutcomeTrendOptimizer,
    combiner: StrategyCombiner,
    fallback: FallbackResolver,
    domains: RwLock<HashMap<String, Arc<RwLock<DomainState>>>>,
}

impl Default for AdaptiveThresholdEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveThresholdEngine {
    /// Engine with default configuration.
    pub fn new() -> Self {
        Self::from_config(EngineConfig::default())
    }

    /// Engine with a custom configuration. Fails if the configuration is
    /// internally inconsistent.
    pub fn with_config(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::from_config(config))
    }

    fn from_config(config: EngineConfig) -> Self {
        Self {
            analyzer: CorrelationAnalyzer::with_config(config.correlation),
            statistical: StatisticalOptimizer::with_config(config.statistical, config.bounds),
            trend: OutcomeTrendOptimizer::with_config(config.trend),
            combiner: StrategyCombiner::with_weights(config.blend, config.bounds),
            fallback: FallbackResolver::with_config(config.fallback),
            domains: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Get or create the state cell for a domain.
    fn domain(&self, domain: &str) -> Arc<RwLock<DomainState>> {
        if let Some(state) = self.domains.read().get(domain) {
            return Arc::clone(state);
        }
        let mut map = self.domains.write();
        let state = map
            .entry(domain.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(DomainState::new(&self.config))));
        Arc::clone(state)
    }

    /// Peek at a domain's state cell without creating it.
    fn domain_if_known(&self, domain: &str) -> Option<Arc<RwLock<DomainState>>> {
        self.domains.read().get(domain).map(Arc::clone)
    }

    // ============================================================
    // Core operations
    // ============================================================

    /// Register a success definition for a domain.
    ///
    /// Registration is append-only: duplicates are kept, and a metric
    /// registered twice carries double weight in the statistical optimizer.
    pub fn register_requirement(
        &self,
        domain: &str,
        definition: SuccessDefinition,
    ) -> EngineResult<()> {
        let cell = self.domain(domain);
        let mut state = cell.write();
        state.registry.register(definition)?;
        debug!(
            domain,
            definitions = state.registry.len(),
            "requirement registered"
        );
        Ok(())
    }

    /// Record the outcome of a completed operation. The journal enforces
    /// its retention policy on every append.
    pub fn record_operation_outcome(
        &self,
        domain: &str,
        record: OutcomeRecord,
    ) -> EngineResult<()> {
        record.validate()?;
        let cell = self.domain(domain);
        let mut state = cell.write();
        state.journal.append(record);
        debug!(domain, journal_len = state.journal.len(), "outcome recorded");
        Ok(())
    }

    /// Resolve the threshold a gate should use right now.
    ///
    /// With no outcome history the fallback resolver consults the caller's
    /// context hints; otherwise the optimizers run over recent history and
    /// their outputs are blended. Either way the result passes through the
    /// caller's constraints and the practical clamp, and the decision lands
    /// in the domain's history.
    pub fn determine_optimal_threshold(
        &self,
        domain: &str,
        context: &DecisionContext,
        constraints: &ThresholdConstraints,
    ) -> EngineResult<f32> {
        context.validate()?;
        constraints.validate()?;

        let cell = self.domain(domain);
        let mut state = cell.write();

        let proposed = if state.journal.is_empty() {
            self.fallback.resolve(domain, context)
        } else {
            self.optimize(domain, &state)
        };

        let shaped = constraints.apply(proposed);
        let threshold = self.config.bounds.clamp(shaped);

        state.recorder.record(ThresholdDecision::new(threshold));
        info!(domain, threshold, "threshold decision resolved");
        Ok(threshold)
    }

    fn optimize(&self, domain: &str, state: &DomainState) -> f32 {
        let window = self
            .config
            .statistical
            .recent_window
            .max(self.config.trend.window);
        let recent: Vec<&OutcomeRecord> = state.journal.recent(window).collect();

        // Current threshold: the last decision, or failing that the last
        // threshold a recorded operation actually ran with.
        let current = state
            .recorder
            .latest()
            .map(|decision| decision.threshold)
            .or_else(|| state.journal.latest().map(|record| record.threshold_used))
            .unwrap_or(self.config.fallback.neutral_threshold);

        let statistical = self.statistical.optimize(&recent, &state.registry, current);
        let trend = self.trend.adjust(&recent, current);
        let combined = self.combiner.combine(statistical, trend);

        if let Some(bucket) = self.analyzer.best_bucket(state.journal.iter()) {
            debug!(
                domain,
                bucket_lower = bucket.lower,
                bucket_rate = bucket.success_rate,
                "best performing threshold bucket"
            );
        }
        debug!(domain, statistical, trend, combined, "optimizer outputs");
        combined
    }

    // ============================================================
    // Reporting
    // ============================================================

    /// Success-pattern analysis and guidance for a domain. Domains below
    /// the configured history minimum, or never seen, report `Learning`.
    pub fn get_recommendations(&self, domain: &str) -> RecommendationReport {
        let min_history = self.config.recommendation.min_history;
        let Some(cell) = self.domain_if_known(domain) else {
            return RecommendationReport::learning(0, min_history);
        };
        let state = cell.read();
        let history_len = state.journal.len();
        if history_len < min_history {
            return RecommendationReport::learning(history_len, min_history);
        }
        let success_rate = overall_success_rate(state.journal.iter());
        let best_bucket = self.analyzer.best_bucket(state.journal.iter());
        RecommendationReport::ready(history_len, success_rate, best_bucket)
    }

    /// Decision-history summary for a domain: current threshold, movement
    /// direction, and threshold-vs-success correlation.
    pub fn trend_report(&self, domain: &str) -> ThresholdTrendReport {
        let Some(cell) = self.domain_if_known(domain) else {
            return DecisionRecorder::new().trend_report(&[]);
        };
        let state = cell.read();
        let outcomes: Vec<&OutcomeRecord> = state.journal.iter().collect();
        state.recorder.trend_report(&outcomes)
    }

    /// The last `n` thresholds resolved for a domain, oldest first.
    pub fn recent_thresholds(&self, domain: &str, n: usize) -> Vec<f32> {
        match self.domain_if_known(domain) {
            Some(cell) => cell.read().recorder.recent_thresholds(n),
            None => Vec::new(),
        }
    }

    /// Operational snapshot of one domain.
    pub fn domain_summary(&self, domain: &str) -> DomainSummary {
        let Some(cell) = self.domain_if_known(domain) else {
            return DomainSummary::default();
        };
        let state = cell.read();
        DomainSummary {
            journal_len: state.journal.len(),
            definition_count: state.registry.len(),
            decision_count: state.recorder.len(),
            last_decided_at: state.recorder.latest().map(|decision| decision.decided_at),
        }
    }

    /// Domains the engine currently tracks, sorted by name.
    pub fn known_domains(&self) -> Vec<String> {
        let mut names: Vec<String> = self.domains.read().keys().cloned().collect();
        names.sort();
        names
    }

    // ============================================================
    // State transfer
    // ============================================================

    /// Serialize a domain's full state (definitions, journal, decision
    /// history) to JSON, e.g. for persistence across restarts.
    pub fn export_domain(&self, domain: &str) -> EngineResult<String> {
        match self.domain_if_known(domain) {
            Some(cell) => Ok(serde_json::to_string(&*cell.read())?),
            None => Ok(serde_json::to_string(&DomainState::new(&self.config))?),
        }
    }

    /// Restore a domain previously exported with [`Self::export_domain`],
    /// replacing any in-memory state for that domain. The imported journal
    /// and decision history keep the retention settings they were exported
    /// with.
    pub fn import_domain(&self, domain: &str, raw: &str) -> EngineResult<()> {
        let state: DomainState = serde_json::from_str(raw)?;
        self.domains
            .write()
            .insert(domain.to_string(), Arc::new(RwLock::new(state)));
        info!(domain, "domain state imported");
        Ok(())
    }
}

/// Lightweight operational snapshot of one domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainSummary {
    /// Outcome records retained.
    pub journal_len: usize,
    /// Registered success definitions.
    pub definition_count: usize,
    /// Threshold decisions retained.
    pub decision_count: usize,
    /// When the most recent decision resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_decided_at: Option<DateTime<Utc>>,
}
