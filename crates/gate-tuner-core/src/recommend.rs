//! Caller-facing recommendation reports.

use serde::{Deserialize, Serialize};

use crate::correlation::BucketStats;

/// History size at which report confidence saturates.
const CONFIDENCE_SCALE: f32 = 100.0;

/// Readiness of a domain's recommendation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecommendationStatus {
    /// Not enough recorded outcomes; analysis has not started.
    Learning,
    /// Enough history to analyze success patterns.
    Ready,
}

/// Success-pattern summary for one domain, with actionable guidance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationReport {
    pub status: RecommendationStatus,
    /// Outcomes still needed before analysis begins. Learning only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples_needed: Option<usize>,
    /// Outcome records currently retained for the domain.
    pub history_len: usize,
    /// Share of flagged outcomes that succeeded, when any are flagged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f32>,
    /// Best-performing threshold bucket, when one qualifies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_bucket: Option<BucketStats>,
    /// Confidence in the analysis, saturating with history size.
    pub confidence: f32,
    /// Human-readable guidance derived from the fields above.
    pub recommendations: Vec<String>,
}

impl RecommendationReport {
    /// Report for a domain still gathering its first outcomes.
    pub fn learning(history_len: usize, min_history: usize) -> Self {
        let needed = min_history.saturating_sub(history_len);
        Self {
            status: RecommendationStatus::Learning,
            samples_needed: Some(needed),
            history_len,
            success_rate: None,
            best_bucket: None,
            confidence: confidence_for(history_len),
            recommendations: vec![format!(
                "Record {needed} more operation outcome(s) to begin threshold analysis"
            )],
        }
    }

    /// Report for a domain with enough history to analyze.
    pub fn ready(
        history_len: usize,
        success_rate: Option<f32>,
        best_bucket: Option<BucketStats>,
    ) -> Self {
        let mut recommendations = Vec::new();
        match &best_bucket {
            Some(bucket) => recommendations.push(format!(
                "Thresholds near {:.2} show the strongest outcomes ({:.0}% success across {} samples)",
                bucket.representative(),
                bucket.success_rate * 100.0,
                bucket.samples
            )),
            None => recommendations.push(
                "No threshold band has enough flagged samples yet; keep recording flagged outcomes"
                    .to_string(),
            ),
        }
        match success_rate {
            Some(rate) if rate < 0.5 => recommendations.push(format!(
                "Overall success rate is {:.0}%; consider revisiting success definitions or relaxing tolerances",
                rate * 100.0
            )),
            None => recommendations.push(
                "Outcomes carry no success flags; flag them to enable correlation analysis"
                    .to_string(),
            ),
            _ => {}
        }

        Self {
            status: RecommendationStatus::Ready,
            samples_needed: None,
            history_len,
            success_rate,
            best_bucket,
            confidence: confidence_for(history_len),
            recommendations,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.status == RecommendationStatus::Ready
    }
}

fn confidence_for(history_len: usize) -> f32 {
    (history_len as f32 / CONFIDENCE_SCALE).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_learning_report_counts_remaining() {
        let report = RecommendationReport::learning(4, 10);
        assert_eq!(report.status, RecommendationStatus::Learning);
        assert_eq!(report.samples_needed, Some(6));
        assert!(!report.is_ready());
        assert!(report.recommendations[0].contains("6 more"));
        println!("[PASS] learning report says how many outcomes remain");
    }

    #[test]
    fn test_confidence_saturates() {
        assert!((RecommendationReport::learning(0, 10).confidence - 0.0).abs() < f32::EPSILON);
        let half = RecommendationReport::ready(50, Some(0.9), None);
        assert!((half.confidence - 0.5).abs() < 1e-6);
        let full = RecommendationReport::ready(400, Some(0.9), None);
        assert!((full.confidence - 1.0).abs() < f32::EPSILON);
        println!("[PASS] confidence grows with history and caps at 1.0");
    }

    #[test]
    fn test_ready_report_names_best_bucket() {
        let bucket = BucketStats {
            lower: 0.70,
            width: 0.05,
            samples: 8,
            success_rate: 0.875,
        };
        let report = RecommendationReport::ready(40, Some(0.8), Some(bucket));
        assert!(report.is_ready());
        assert!(report.recommendations[0].contains("Thresholds near 0.7"));
        assert!(report.recommendations[0].contains("8 samples"));
        println!("[PASS] ready report surfaces the winning bucket");
    }

    #[test]
    fn test_low_success_rate_adds_warning() {
        let report = RecommendationReport::ready(40, Some(0.3), None);
        assert!(report
            .recommendations
            .iter()
            .any(|line| line.contains("success rate is 30%")));
        println!("[PASS] poor success rate is called out");
    }

    #[test]
    fn test_unflagged_history_adds_guidance() {
        let report = RecommendationReport::ready(40, None, None);
        assert!(report
            .recommendations
            .iter()
            .any(|line| line.contains("no success flags")));
        println!("[PASS] flagless history asks for flagged outcomes");
    }

    #[test]
    fn test_report_serializes() {
        let report = RecommendationReport::learning(2, 10);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"learning\""));
        let back: RecommendationReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, back);
        println!("[PASS] report survives serde round trip");
    }
}
