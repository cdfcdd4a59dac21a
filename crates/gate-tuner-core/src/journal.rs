//! Bounded outcome history for one decision domain.

use std::collections::VecDeque;

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::RetentionConfig;
use crate::types::OutcomeRecord;

/// Append-only journal of decision outcomes, oldest first.
///
/// Arrival order is the journal's chronology: records are appended as their
/// outcomes resolve, and eviction always drops from the front. Retention is
/// enforced on every append, so the journal never exceeds its configured
/// record cap and sheds entries older than the age cap.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutcomeJournal {
    retention: RetentionConfig,
    records: VecDeque<OutcomeRecord>,
}

impl Default for OutcomeJournal {
    fn default() -> Self {
        Self::new()
    }
}

impl OutcomeJournal {
    pub fn new() -> Self {
        Self::with_retention(RetentionConfig::default())
    }

    pub fn with_retention(retention: RetentionConfig) -> Self {
        Self {
            retention,
            records: VecDeque::new(),
        }
    }

    pub fn retention(&self) -> &RetentionConfig {
        &self.retention
    }

    /// Append a record and enforce retention. O(1) amortized.
    pub fn append(&mut self, record: OutcomeRecord) {
        self.records.push_back(record);
        self.evict();
    }

    fn evict(&mut self) {
        while self.records.len() > self.retention.max_records {
            self.records.pop_front();
        }
        let cutoff = Utc::now() - Duration::days(self.retention.max_age_days);
        while self
            .records
            .front()
            .is_some_and(|record| record.recorded_at < cutoff)
        {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All retained records, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &OutcomeRecord> {
        self.records.iter()
    }

    /// The most recent `n` records, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &OutcomeRecord> {
        self.records.iter().skip(self.records.len().saturating_sub(n))
    }

    pub fn oldest(&self) -> Option<&OutcomeRecord> {
        self.records.front()
    }

    pub fn latest(&self) -> Option<&OutcomeRecord> {
        self.records.back()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.records.iter().any(|record| record.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_retention(max_records: usize) -> RetentionConfig {
        RetentionConfig {
            max_records,
            max_age_days: 90,
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let mut journal = OutcomeJournal::new();
        for i in 0..5 {
            journal.append(OutcomeRecord::new(0.1 * (i + 1) as f32));
        }
        let thresholds: Vec<f32> = journal.iter().map(|r| r.threshold_used).collect();
        assert_eq!(thresholds.len(), 5);
        assert!(thresholds.windows(2).all(|w| w[0] < w[1]));
        println!("[PASS] records come back oldest first");
    }

    #[test]
    fn test_record_cap_evicts_oldest() {
        let mut journal = OutcomeJournal::with_retention(small_retention(3));
        let first = OutcomeRecord::new(0.5);
        let first_id = first.id;
        journal.append(first);
        for _ in 0..3 {
            journal.append(OutcomeRecord::new(0.6));
        }
        assert_eq!(journal.len(), 3);
        assert!(!journal.contains(first_id));
        println!("[PASS] exceeding the cap drops the oldest record");
    }

    #[test]
    fn test_age_cap_evicts_stale_records() {
        let mut journal = OutcomeJournal::with_retention(RetentionConfig {
            max_records: 100,
            max_age_days: 30,
        });
        let stale = OutcomeRecord::new(0.5).with_timestamp(Utc::now() - Duration::days(45));
        let stale_id = stale.id;
        journal.append(stale);
        journal.append(OutcomeRecord::new(0.6));
        assert_eq!(journal.len(), 1);
        assert!(!journal.contains(stale_id));
        println!("[PASS] records older than the age cap are shed");
    }

    #[test]
    fn test_recent_returns_tail_in_order() {
        let mut journal = OutcomeJournal::new();
        for i in 0..10 {
            journal.append(OutcomeRecord::new(0.05 * (i + 1) as f32));
        }
        let tail: Vec<f32> = journal.recent(3).map(|r| r.threshold_used).collect();
        assert_eq!(tail.len(), 3);
        assert!((tail[0] - 0.40).abs() < 1e-6);
        assert!((tail[2] - 0.50).abs() < 1e-6);
        println!("[PASS] recent window is the chronological tail");
    }

    #[test]
    fn test_recent_larger_than_len_returns_all() {
        let mut journal = OutcomeJournal::new();
        journal.append(OutcomeRecord::new(0.5));
        assert_eq!(journal.recent(50).count(), 1);
        println!("[PASS] oversized recent window returns everything");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut journal = OutcomeJournal::with_retention(small_retention(10));
        journal.append(OutcomeRecord::new(0.4).with_success(true));
        let json = serde_json::to_string(&journal).unwrap();
        let back: OutcomeJournal = serde_json::from_str(&json).unwrap();
        assert_eq!(back.len(), 1);
        assert_eq!(back.retention().max_records, 10);
        println!("[PASS] journal state survives serde round trip");
    }
}
