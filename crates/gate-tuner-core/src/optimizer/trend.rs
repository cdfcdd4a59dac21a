//! Outcome-trend feedback control.

use tracing::debug;

use crate::config::TrendConfig;
use crate::types::OutcomeRecord;

/// Bang-bang controller over recent business impact.
///
/// Averages the most recent impact scores and reacts only outside the
/// configured bands: a surge raises the current threshold multiplicatively
/// up to a cap, a slump cuts it down to a floor, and anything in between
/// leaves it untouched. Deliberately coarse; the statistical optimizer
/// supplies the fine-grained signal and the combiner balances the two.
#[derive(Debug, Clone, Default)]
pub struct OutcomeTrendOptimizer {
    config: TrendConfig,
}

impl OutcomeTrendOptimizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TrendConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrendConfig {
        &self.config
    }

    /// Adjust `current_threshold` against the recent impact trend. Records
    /// are chronological, oldest first; records without metrics carry no
    /// impact score and are skipped.
    pub fn adjust(&self, records: &[&OutcomeRecord], current_threshold: f32) -> f32 {
        let scores: Vec<f32> = records
            .iter()
            .rev()
            .filter_map(|record| record.impact_score())
            .take(self.config.window)
            .collect();
        if scores.is_empty() {
            return current_threshold;
        }

        let mean = scores.iter().sum::<f32>() / scores.len() as f32;
        if mean > self.config.surge_threshold {
            let raised = (current_threshold * self.config.raise_factor).min(self.config.raise_cap);
            debug!(mean_impact = mean, from = current_threshold, to = raised, "impact surge");
            raised
        } else if mean < self.config.slump_threshold {
            let cut = (current_threshold * self.config.cut_factor).max(self.config.cut_floor);
            debug!(mean_impact = mean, from = current_threshold, to = cut, "impact slump");
            cut
        } else {
            current_threshold
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impact_records(score: f32, count: usize) -> Vec<OutcomeRecord> {
        (0..count)
            .map(|_| OutcomeRecord::new(0.5).with_metric("impact", score))
            .collect()
    }

    #[test]
    fn test_surge_raises_threshold() {
        let records = impact_records(0.9, 10);
        let refs: Vec<&OutcomeRecord> = records.iter().collect();
        let adjusted = OutcomeTrendOptimizer::new().adjust(&refs, 0.5);
        assert!((adjusted - 0.55).abs() < 1e-6);
        println!("[PASS] sustained high impact raises the threshold");
    }

    #[test]
    fn test_slump_cuts_threshold() {
        let records = impact_records(0.1, 10);
        let refs: Vec<&OutcomeRecord> = records.iter().collect();
        let adjusted = OutcomeTrendOptimizer::new().adjust(&refs, 0.5);
        assert!((adjusted - 0.4).abs() < 1e-6);
        println!("[PASS] sustained low impact cuts the threshold");
    }

    #[test]
    fn test_mid_band_leaves_threshold_unchanged() {
        let records = impact_records(0.5, 10);
        let refs: Vec<&OutcomeRecord> = records.iter().collect();
        let adjusted = OutcomeTrendOptimizer::new().adjust(&refs, 0.62);
        assert!((adjusted - 0.62).abs() < f32::EPSILON);
        println!("[PASS] mid-band impact is left alone");
    }

    #[test]
    fn test_raise_respects_cap() {
        let records = impact_records(0.95, 10);
        let refs: Vec<&OutcomeRecord> = records.iter().collect();
        let adjusted = OutcomeTrendOptimizer::new().adjust(&refs, 0.9);
        assert!((adjusted - 0.95).abs() < f32::EPSILON);
        println!("[PASS] a raise never exceeds the cap");
    }

    #[test]
    fn test_cut_respects_floor() {
        let records = impact_records(0.05, 10);
        let refs: Vec<&OutcomeRecord> = records.iter().collect();
        let adjusted = OutcomeTrendOptimizer::new().adjust(&refs, 0.22);
        assert!((adjusted - 0.2).abs() < f32::EPSILON);
        println!("[PASS] a cut never drops below the floor");
    }

    #[test]
    fn test_no_impact_scores_returns_current() {
        let records = vec![OutcomeRecord::new(0.5).with_success(true)];
        let refs: Vec<&OutcomeRecord> = records.iter().collect();
        let adjusted = OutcomeTrendOptimizer::new().adjust(&refs, 0.44);
        assert!((adjusted - 0.44).abs() < f32::EPSILON);
        println!("[PASS] flag-only records produce no trend signal");
    }

    #[test]
    fn test_window_ignores_older_scores() {
        // ten recent slump scores behind ten older surge scores
        let mut records = impact_records(0.9, 10);
        records.extend(impact_records(0.1, 10));
        let refs: Vec<&OutcomeRecord> = records.iter().collect();
        let adjusted = OutcomeTrendOptimizer::new().adjust(&refs, 0.5);
        assert!((adjusted - 0.4).abs() < 1e-6);
        println!("[PASS] only the recent window drives the adjustment");
    }
}
