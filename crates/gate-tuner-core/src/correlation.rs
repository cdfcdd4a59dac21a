//! Correlation analysis between threshold bands and outcome success.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::CorrelationConfig;
use crate::types::OutcomeRecord;

/// Aggregated success statistics for one threshold bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    /// Inclusive lower edge of the bucket.
    pub lower: f32,
    /// Bucket width.
    pub width: f32,
    /// Flagged records that landed in the bucket.
    pub samples: usize,
    /// Share of those records marked successful.
    pub success_rate: f32,
}

impl BucketStats {
    /// Representative threshold for the bucket: its midpoint.
    pub fn representative(&self) -> f32 {
        self.lower + self.width / 2.0
    }
}

/// Partitions outcome history into fixed-width threshold buckets and ranks
/// them by observed success rate.
///
/// Only records carrying an explicit `success` flag vote; records with
/// metrics but no flag are ignored here (the optimizers consume those).
#[derive(Debug, Clone, Default)]
pub struct CorrelationAnalyzer {
    config: CorrelationConfig,
}

impl CorrelationAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: CorrelationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CorrelationConfig {
        &self.config
    }

    fn bucket_index(&self, threshold: f32) -> i64 {
        // Small nudge keeps band edges (e.g. 0.70 / 0.05) from rounding
        // down into the neighboring bucket.
        ((f64::from(threshold) / f64::from(self.config.bucket_width)) + 1e-4).floor() as i64
    }

    /// Per-bucket success statistics over the given records, ordered by
    /// bucket edge. Buckets below the sample minimum are included; callers
    /// that need qualified buckets filter on `samples`.
    pub fn bucket_stats<'a, I>(&self, records: I) -> Vec<BucketStats>
    where
        I: IntoIterator<Item = &'a OutcomeRecord>,
    {
        let mut buckets: BTreeMap<i64, (usize, usize)> = BTreeMap::new();
        for record in records {
            let Some(success) = record.success else {
                continue;
            };
            let entry = buckets.entry(self.bucket_index(record.threshold_used)).or_insert((0, 0));
            entry.0 += 1;
            if success {
                entry.1 += 1;
            }
        }

        buckets
            .into_iter()
            .map(|(index, (samples, successes))| BucketStats {
                lower: index as f32 * self.config.bucket_width,
                width: self.config.bucket_width,
                samples,
                success_rate: successes as f32 / samples as f32,
            })
            .collect()
    }

    /// The best-performing bucket that meets the configured sample minimum,
    /// or `None` when no bucket has enough data.
    pub fn best_bucket<'a, I>(&self, records: I) -> Option<BucketStats>
    where
        I: IntoIterator<Item = &'a OutcomeRecord>,
    {
        self.bucket_stats(records)
            .into_iter()
            .filter(|bucket| bucket.samples >= self.config.min_bucket_samples)
            .max_by(|a, b| {
                a.success_rate
                    .partial_cmp(&b.success_rate)
                    .unwrap_or(Ordering::Equal)
            })
    }
}

/// Pearson correlation between the threshold in effect and the success flag,
/// over records that carry the flag. `None` below two samples or when either
/// series has zero variance.
pub fn threshold_success_correlation<'a, I>(records: I) -> Option<f32>
where
    I: IntoIterator<Item = &'a OutcomeRecord>,
{
    let pairs: Vec<(f32, f32)> = records
        .into_iter()
        .filter_map(|record| {
            record
                .success
                .map(|s| (record.threshold_used, if s { 1.0 } else { 0.0 }))
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f32;
    let mean_x: f32 = pairs.iter().map(|(x, _)| x).sum::<f32>() / n;
    let mean_y: f32 = pairs.iter().map(|(_, y)| y).sum::<f32>() / n;

    let mut covariance = 0.0f32;
    let mut var_x = 0.0f32;
    let mut var_y = 0.0f32;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        covariance += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x <= f32::EPSILON || var_y <= f32::EPSILON {
        return None;
    }
    Some(covariance / (var_x.sqrt() * var_y.sqrt()))
}

/// Share of flagged records marked successful, or `None` when no record
/// carries a flag.
pub fn overall_success_rate<'a, I>(records: I) -> Option<f32>
where
    I: IntoIterator<Item = &'a OutcomeRecord>,
{
    let mut flagged = 0usize;
    let mut successes = 0usize;
    for record in records {
        if let Some(success) = record.success {
            flagged += 1;
            if success {
                successes += 1;
            }
        }
    }
    if flagged == 0 {
        return None;
    }
    Some(successes as f32 / flagged as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flagged(threshold: f32, success: bool) -> OutcomeRecord {
        OutcomeRecord::new(threshold).with_success(success)
    }

    #[test]
    fn test_best_bucket_prefers_highest_success_rate() {
        let mut records = Vec::new();
        // [0.70, 0.75): four successes
        for threshold in [0.70, 0.71, 0.72, 0.74] {
            records.push(flagged(threshold, true));
        }
        // [0.50, 0.55): mixed results
        records.push(flagged(0.50, true));
        records.push(flagged(0.52, false));
        records.push(flagged(0.53, false));

        let analyzer = CorrelationAnalyzer::new();
        let best = analyzer.best_bucket(records.iter()).unwrap();
        assert!((best.lower - 0.70).abs() < 1e-3);
        assert!((best.success_rate - 1.0).abs() < f32::EPSILON);
        assert!((best.representative() - 0.725).abs() < 1e-3);
        println!("[PASS] all-success band wins the bucket ranking");
    }

    #[test]
    fn test_bucket_below_sample_minimum_cannot_win() {
        let mut records = Vec::new();
        // two perfect samples: below the minimum of three
        records.push(flagged(0.90, true));
        records.push(flagged(0.91, true));
        // three mediocre samples: qualifies
        records.push(flagged(0.40, true));
        records.push(flagged(0.41, false));
        records.push(flagged(0.42, true));

        let analyzer = CorrelationAnalyzer::new();
        let best = analyzer.best_bucket(records.iter()).unwrap();
        assert!((best.lower - 0.40).abs() < 1e-3);
        println!("[PASS] undersampled bucket is excluded from ranking");
    }

    #[test]
    fn test_no_qualified_bucket_returns_none() {
        let records = vec![flagged(0.5, true), flagged(0.9, false)];
        let analyzer = CorrelationAnalyzer::new();
        assert!(analyzer.best_bucket(records.iter()).is_none());
        println!("[PASS] sparse history yields no bucket recommendation");
    }

    #[test]
    fn test_unflagged_records_do_not_vote() {
        let records = vec![
            OutcomeRecord::new(0.5).with_metric("conversion", 0.9),
            flagged(0.5, true),
        ];
        let analyzer = CorrelationAnalyzer::new();
        let stats = analyzer.bucket_stats(records.iter());
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0].samples, 1);
        println!("[PASS] records without a success flag are skipped");
    }

    #[test]
    fn test_band_edge_lands_in_its_own_bucket() {
        let analyzer = CorrelationAnalyzer::new();
        let stats = analyzer.bucket_stats([flagged(0.70, true)].iter());
        assert_eq!(stats.len(), 1);
        assert!((stats[0].lower - 0.70).abs() < 1e-3);
        println!("[PASS] a record at a bucket edge stays in that bucket");
    }

    #[test]
    fn test_correlation_sign_tracks_success_direction() {
        // successes concentrated at high thresholds
        let records = vec![
            flagged(0.2, false),
            flagged(0.3, false),
            flagged(0.7, true),
            flagged(0.8, true),
        ];
        let r = threshold_success_correlation(records.iter()).unwrap();
        assert!(r > 0.9);
        println!("[PASS] positive correlation when high thresholds succeed");
    }

    #[test]
    fn test_correlation_none_on_zero_variance() {
        let records = vec![flagged(0.5, true), flagged(0.5, false)];
        assert!(threshold_success_correlation(records.iter()).is_none());
        let uniform = vec![flagged(0.4, true), flagged(0.6, true)];
        assert!(threshold_success_correlation(uniform.iter()).is_none());
        println!("[PASS] degenerate series produce no correlation");
    }

    #[test]
    fn test_overall_success_rate() {
        let records = vec![
            flagged(0.5, true),
            flagged(0.5, true),
            flagged(0.5, false),
            OutcomeRecord::new(0.5),
        ];
        let rate = overall_success_rate(records.iter()).unwrap();
        assert!((rate - 2.0 / 3.0).abs() < 1e-6);
        assert!(overall_success_rate(std::iter::empty()).is_none());
        println!("[PASS] success rate counts only flagged records");
    }
}
