//! Adaptive threshold optimization for decision gates.
//!
//! Services that gate operations on a score (admit a record, approve a
//! payment, surface a review) usually hardcode the cut-off. This crate
//! replaces the hardcoded number with a learned one: callers describe what
//! business success means per domain, report outcomes as they resolve, and
//! ask for the threshold to use right now. Every answer stays inside a
//! practical band so a gate can never silently admit everything or block
//! everything.
//!
//! # Architecture
//!
//! - [`journal`]: bounded, chronological outcome history per domain
//! - [`registry`]: append-only store of caller success definitions
//! - [`correlation`]: bucketed threshold-vs-success analysis
//! - [`optimizer`]: statistical and trend strategies plus their blending
//! - [`constraints`]: caller-supplied clamps and shaping hooks
//! - [`fallback`]: cold-start resolution from context hints
//! - [`recorder`]: decision history and trend reporting
//! - [`recommend`]: caller-facing guidance reports
//! - [`engine`]: the facade tying the pipeline together per domain
//!
//! # Example
//!
//! ```
//! use gate_tuner_core::{
//!     AdaptiveThresholdEngine, DecisionContext, OutcomeRecord, SuccessDefinition,
//!     ThresholdConstraints,
//! };
//!
//! let engine = AdaptiveThresholdEngine::new();
//! let domain = "inbound-lead-quality";
//!
//! // describe success for this domain
//! engine
//!     .register_requirement(
//!         domain,
//!         SuccessDefinition::new(
//!             "conversion",
//!             "share of admitted leads that convert within 30 days",
//!             0.85,
//!             250.0,
//!             0.9,
//!             0.1,
//!         ),
//!     )
//!     .unwrap();
//!
//! // first decision: no history yet, the caller's hint wins
//! let context = DecisionContext::new().with_initial_threshold(0.42);
//! let first = engine
//!     .determine_optimal_threshold(domain, &context, &ThresholdConstraints::new())
//!     .unwrap();
//! assert!((first - 0.42).abs() < f32::EPSILON);
//!
//! // outcomes feed back in as operations complete
//! engine
//!     .record_operation_outcome(
//!         domain,
//!         OutcomeRecord::new(first)
//!             .with_metric("conversion", 0.9)
//!             .with_success(true),
//!     )
//!     .unwrap();
//!
//! // later decisions learn from the recorded history
//! let next = engine
//!     .determine_optimal_threshold(domain, &context, &ThresholdConstraints::new())
//!     .unwrap();
//! assert!((0.10..=0.99).contains(&next));
//! ```

pub mod config;
pub mod constraints;
pub mod correlation;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod journal;
pub mod optimizer;
pub mod recommend;
pub mod recorder;
pub mod registry;
pub mod types;

pub use config::EngineConfig;
pub use constraints::{ConstraintStrategy, ThresholdConstraints};
pub use engine::{AdaptiveThresholdEngine, DomainSummary};
pub use error::{EngineError, EngineResult};
pub use recommend::{RecommendationReport, RecommendationStatus};
pub use recorder::ThresholdTrendReport;
pub use types::{
    DecisionContext, OutcomeRecord, SuccessDefinition, ThresholdDecision, TrendDirection,
};
