//! Threshold optimization strategies and their blending.
//!
//! Two independent strategies look at the same recent history: the
//! statistical optimizer derives a target from priority-weighted metric
//! values, and the trend optimizer nudges the current threshold in response
//! to impact surges or slumps. The combiner folds both into one bounded
//! threshold.

mod combiner;
mod statistical;
mod trend;

pub use combiner::StrategyCombiner;
pub use statistical::StatisticalOptimizer;
pub use trend::OutcomeTrendOptimizer;
