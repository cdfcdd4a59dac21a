//! Decision history and threshold trend reporting.

use std::collections::VecDeque;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::RetentionConfig;
use crate::correlation::threshold_success_correlation;
use crate::types::{OutcomeRecord, ThresholdDecision, TrendDirection};

/// Number of recent decisions compared when classifying the trend.
pub const TREND_WINDOW: usize = 5;
/// Threshold delta within which the trend counts as stable.
pub const TREND_DELTA_BAND: f32 = 0.05;
/// Flagged samples that amount to full significance in the placeholder
/// estimate below.
const SIGNIFICANCE_SCALE: f32 = 100.0;

/// Bounded per-domain history of resolved threshold decisions, under the
/// same retention discipline as the outcome journal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionRecorder {
    retention: RetentionConfig,
    decisions: VecDeque<ThresholdDecision>,
}

impl Default for DecisionRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl DecisionRecorder {
    pub fn new() -> Self {
        Self::with_retention(RetentionConfig::default())
    }

    pub fn with_retention(retention: RetentionConfig) -> Self {
        Self {
            retention,
            decisions: VecDeque::new(),
        }
    }

    /// Append a decision and enforce retention.
    pub fn record(&mut self, decision: ThresholdDecision) {
        self.decisions.push_back(decision);
        while self.decisions.len() > self.retention.max_records {
            self.decisions.pop_front();
        }
        let cutoff = Utc::now() - Duration::days(self.retention.max_age_days);
        while self
            .decisions
            .front()
            .is_some_and(|decision| decision.decided_at < cutoff)
        {
            self.decisions.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.decisions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decisions.is_empty()
    }

    pub fn latest(&self) -> Option<&ThresholdDecision> {
        self.decisions.back()
    }

    /// The most recent `n` thresholds, oldest first.
    pub fn recent_thresholds(&self, n: usize) -> Vec<f32> {
        self.decisions
            .iter()
            .skip(self.decisions.len().saturating_sub(n))
            .map(|decision| decision.threshold)
            .collect()
    }

    /// Classify recent movement by comparing the first and last values of
    /// the trend window against the delta band.
    pub fn trend(&self) -> TrendDirection {
        let window = self.recent_thresholds(TREND_WINDOW);
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return TrendDirection::Stable;
        };
        let delta = last - first;
        if delta > TREND_DELTA_BAND {
            TrendDirection::Increasing
        } else if delta < -TREND_DELTA_BAND {
            TrendDirection::Decreasing
        } else {
            TrendDirection::Stable
        }
    }

    /// Build the trend report for this domain. `outcomes` is the domain's
    /// journal content, used for the threshold-vs-success correlation.
    pub fn trend_report(&self, outcomes: &[&OutcomeRecord]) -> ThresholdTrendReport {
        let flagged = outcomes
            .iter()
            .filter(|record| record.success.is_some())
            .count();
        ThresholdTrendReport {
            total_decisions: self.decisions.len(),
            current_threshold: self.latest().map(|decision| decision.threshold),
            trend: self.trend(),
            success_correlation: threshold_success_correlation(outcomes.iter().copied()),
            significance: (flagged as f32 / SIGNIFICANCE_SCALE).min(1.0),
        }
    }
}

/// Summary of a domain's threshold decision history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdTrendReport {
    /// Decisions currently retained for the domain.
    pub total_decisions: usize,
    /// Most recently resolved threshold, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_threshold: Option<f32>,
    /// Direction of recent threshold movement.
    pub trend: TrendDirection,
    /// Pearson correlation between the threshold in effect and outcome
    /// success. Absent below two flagged samples or with zero variance.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_correlation: Option<f32>,
    /// Crude confidence estimate derived from flagged sample count alone.
    /// A placeholder, not a hypothesis test.
    pub significance: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_thresholds(recorder: &mut DecisionRecorder, thresholds: &[f32]) {
        for &threshold in thresholds {
            recorder.record(ThresholdDecision::new(threshold));
        }
    }

    #[test]
    fn test_trend_increasing() {
        let mut recorder = DecisionRecorder::new();
        record_thresholds(&mut recorder, &[0.4, 0.45, 0.5, 0.55, 0.6]);
        assert_eq!(recorder.trend(), TrendDirection::Increasing);
        println!("[PASS] rising thresholds classify as increasing");
    }

    #[test]
    fn test_trend_decreasing() {
        let mut recorder = DecisionRecorder::new();
        record_thresholds(&mut recorder, &[0.6, 0.55, 0.5, 0.45, 0.4]);
        assert_eq!(recorder.trend(), TrendDirection::Decreasing);
        println!("[PASS] falling thresholds classify as decreasing");
    }

    #[test]
    fn test_trend_stable_within_band() {
        let mut recorder = DecisionRecorder::new();
        record_thresholds(&mut recorder, &[0.50, 0.52, 0.49, 0.51, 0.53]);
        assert_eq!(recorder.trend(), TrendDirection::Stable);
        println!("[PASS] movement inside the delta band is stable");
    }

    #[test]
    fn test_trend_window_ignores_older_history() {
        let mut recorder = DecisionRecorder::new();
        // old climb followed by a flat recent window
        record_thresholds(&mut recorder, &[0.2, 0.3, 0.4, 0.5, 0.5, 0.5, 0.5, 0.5, 0.5]);
        assert_eq!(recorder.trend(), TrendDirection::Stable);
        println!("[PASS] only the recent window is classified");
    }

    #[test]
    fn test_empty_recorder_is_stable() {
        let recorder = DecisionRecorder::new();
        assert_eq!(recorder.trend(), TrendDirection::Stable);
        assert!(recorder.latest().is_none());
        println!("[PASS] no decisions classify as stable");
    }

    #[test]
    fn test_retention_cap_applies() {
        let mut recorder = DecisionRecorder::with_retention(RetentionConfig {
            max_records: 4,
            max_age_days: 90,
        });
        record_thresholds(&mut recorder, &[0.1, 0.2, 0.3, 0.4, 0.5]);
        assert_eq!(recorder.len(), 4);
        let kept = recorder.recent_thresholds(10);
        assert!((kept[0] - 0.2).abs() < f32::EPSILON);
        println!("[PASS] decision history honors the record cap");
    }

    #[test]
    fn test_trend_report_fields() {
        let mut recorder = DecisionRecorder::new();
        record_thresholds(&mut recorder, &[0.4, 0.5, 0.6, 0.7, 0.8]);

        let outcomes = vec![
            OutcomeRecord::new(0.3).with_success(false),
            OutcomeRecord::new(0.8).with_success(true),
            OutcomeRecord::new(0.7).with_success(true),
        ];
        let refs: Vec<&OutcomeRecord> = outcomes.iter().collect();
        let report = recorder.trend_report(&refs);

        assert_eq!(report.total_decisions, 5);
        assert!((report.current_threshold.unwrap() - 0.8).abs() < f32::EPSILON);
        assert_eq!(report.trend, TrendDirection::Increasing);
        assert!(report.success_correlation.unwrap() > 0.0);
        assert!((report.significance - 0.03).abs() < 1e-6);
        println!("[PASS] trend report aggregates history and correlation");
    }
}
