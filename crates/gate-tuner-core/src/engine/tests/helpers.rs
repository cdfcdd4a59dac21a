//! Shared builders for engine tests.

use crate::engine::AdaptiveThresholdEngine;
use crate::types::{OutcomeRecord, SuccessDefinition};

pub fn flagged_outcome(threshold: f32, success: bool) -> OutcomeRecord {
    OutcomeRecord::new(threshold).with_success(success)
}

pub fn metric_outcome(threshold: f32, name: &str, value: f32) -> OutcomeRecord {
    OutcomeRecord::new(threshold).with_metric(name, value)
}

pub fn conversion_definition(priority: f32, tolerance: f32) -> SuccessDefinition {
    SuccessDefinition::new(
        "conversion",
        "share of admitted sessions that convert",
        0.85,
        250.0,
        priority,
        tolerance,
    )
}

pub fn seed_outcomes(
    engine: &AdaptiveThresholdEngine,
    domain: &str,
    records: impl IntoIterator<Item = OutcomeRecord>,
) {
    for record in records {
        engine
            .record_operation_outcome(domain, record)
            .expect("seed outcome should record");
    }
}
