//! Core data types shared across the engine.

mod context;
mod decision;
mod definition;
mod outcome;

pub use context::DecisionContext;
pub use decision::{ThresholdDecision, TrendDirection};
pub use definition::SuccessDefinition;
pub use outcome::OutcomeRecord;
