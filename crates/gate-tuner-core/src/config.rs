//! Engine configuration.
//!
//! Every tunable the optimizers consume lives here so deployments can adjust
//! behavior without code changes. Values load from TOML files layered with
//! `GATE_TUNER__`-prefixed environment variables, and every field has a
//! working default.

use std::path::Path;

use config::{Config as ConfigBuilder, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Top-level configuration for the adaptive threshold engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub bounds: PracticalBounds,
    pub retention: RetentionConfig,
    pub correlation: CorrelationConfig,
    pub statistical: StatisticalConfig,
    pub trend: TrendConfig,
    pub blend: BlendWeights,
    pub fallback: FallbackConfig,
    pub recommendation: RecommendationConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bounds: PracticalBounds::default(),
            retention: RetentionConfig::default(),
            correlation: CorrelationConfig::default(),
            statistical: StatisticalConfig::default(),
            trend: TrendConfig::default(),
            blend: BlendWeights::default(),
            fallback: FallbackConfig::default(),
            recommendation: RecommendationConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from layered sources: `config/default.toml`, then
    /// `config/{GATE_TUNER_ENV}.toml`, then `GATE_TUNER__`-prefixed
    /// environment variables. Missing sources fall back to defaults.
    pub fn load() -> EngineResult<Self> {
        let env = std::env::var("GATE_TUNER_ENV").unwrap_or_else(|_| "development".to_string());

        let settings = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                Environment::with_prefix("GATE_TUNER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: EngineConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a single TOML file. Fields absent from the
    /// file keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            EngineError::ConfigError(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: EngineConfig = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field consistency. Called by `load`/`from_file` and by the
    /// engine constructor for hand-built configs.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.bounds.floor.is_finite()
            || !self.bounds.ceiling.is_finite()
            || self.bounds.floor <= 0.0
            || self.bounds.ceiling >= 1.0
            || self.bounds.floor >= self.bounds.ceiling
        {
            return Err(EngineError::ConfigError(format!(
                "bounds must satisfy 0.0 < floor < ceiling < 1.0, got [{}, {}]",
                self.bounds.floor, self.bounds.ceiling
            )));
        }
        if self.retention.max_records == 0 {
            return Err(EngineError::ConfigError(
                "retention.max_records must be at least 1".to_string(),
            ));
        }
        if self.retention.max_age_days <= 0 {
            return Err(EngineError::ConfigError(
                "retention.max_age_days must be positive".to_string(),
            ));
        }
        if !self.correlation.bucket_width.is_finite()
            || self.correlation.bucket_width <= 0.0
            || self.correlation.bucket_width > 0.5
        {
            return Err(EngineError::ConfigError(format!(
                "correlation.bucket_width must be within (0.0, 0.5], got {}",
                self.correlation.bucket_width
            )));
        }
        if self.correlation.min_bucket_samples == 0 {
            return Err(EngineError::ConfigError(
                "correlation.min_bucket_samples must be at least 1".to_string(),
            ));
        }
        if self.statistical.min_observations == 0 {
            return Err(EngineError::ConfigError(
                "statistical.min_observations must be at least 1".to_string(),
            ));
        }
        if self.statistical.recent_window < self.statistical.min_observations {
            return Err(EngineError::ConfigError(format!(
                "statistical.recent_window ({}) must cover min_observations ({})",
                self.statistical.recent_window, self.statistical.min_observations
            )));
        }
        if self.statistical.fallback_window == 0 {
            return Err(EngineError::ConfigError(
                "statistical.fallback_window must be at least 1".to_string(),
            ));
        }
        if self.trend.window == 0 {
            return Err(EngineError::ConfigError(
                "trend.window must be at least 1".to_string(),
            ));
        }
        if !self.trend.surge_threshold.is_finite()
            || !self.trend.slump_threshold.is_finite()
            || self.trend.slump_threshold <= 0.0
            || self.trend.surge_threshold >= 1.0
            || self.trend.slump_threshold >= self.trend.surge_threshold
        {
            return Err(EngineError::ConfigError(format!(
                "trend bands must satisfy 0.0 < slump < surge < 1.0, got slump={} surge={}",
                self.trend.slump_threshold, self.trend.surge_threshold
            )));
        }
        if !self.trend.raise_factor.is_finite() || self.trend.raise_factor < 1.0 {
            return Err(EngineError::ConfigError(format!(
                "trend.raise_factor must be at least 1.0, got {}",
                self.trend.raise_factor
            )));
        }
        if !self.trend.cut_factor.is_finite()
            || self.trend.cut_factor <= 0.0
            || self.trend.cut_factor > 1.0
        {
            return Err(EngineError::ConfigError(format!(
                "trend.cut_factor must be within (0.0, 1.0], got {}",
                self.trend.cut_factor
            )));
        }
        if !self.trend.raise_cap.is_finite()
            || !self.trend.cut_floor.is_finite()
            || self.trend.cut_floor <= 0.0
            || self.trend.raise_cap >= 1.0
            || self.trend.cut_floor >= self.trend.raise_cap
        {
            return Err(EngineError::ConfigError(format!(
                "trend limits must satisfy 0.0 < cut_floor < raise_cap < 1.0, got floor={} cap={}",
                self.trend.cut_floor, self.trend.raise_cap
            )));
        }
        if !self.blend.statistical.is_finite()
            || !self.blend.trend.is_finite()
            || self.blend.statistical < 0.0
            || self.blend.trend < 0.0
            || self.blend.statistical + self.blend.trend <= 0.0
        {
            return Err(EngineError::ConfigError(format!(
                "blend weights must be non-negative with a positive sum, got statistical={} trend={}",
                self.blend.statistical, self.blend.trend
            )));
        }
        if !self.fallback.neutral_threshold.is_finite()
            || self.fallback.neutral_threshold <= 0.0
            || self.fallback.neutral_threshold >= 1.0
        {
            return Err(EngineError::ConfigError(format!(
                "fallback.neutral_threshold must be within (0.0, 1.0), got {}",
                self.fallback.neutral_threshold
            )));
        }
        if self.recommendation.min_history == 0 {
            return Err(EngineError::ConfigError(
                "recommendation.min_history must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ============================================================
// Sub-configurations
// ============================================================

/// Hard floor and ceiling applied to every resolved threshold. Keeps gates
/// from silently admitting everything or blocking everything.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PracticalBounds {
    pub floor: f32,
    pub ceiling: f32,
}

impl Default for PracticalBounds {
    fn default() -> Self {
        Self {
            floor: 0.10,
            ceiling: 0.99,
        }
    }
}

impl PracticalBounds {
    /// Clamp a threshold into the practical range. NaN pins to the floor, so
    /// the result is always inside the band.
    pub fn clamp(&self, threshold: f32) -> f32 {
        if threshold.is_nan() {
            return self.floor;
        }
        threshold.clamp(self.floor, self.ceiling)
    }
}

/// Retention policy shared by the outcome journal and the decision recorder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Maximum entries kept per domain. Oldest are evicted first.
    pub max_records: usize,
    /// Maximum entry age in days.
    pub max_age_days: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            max_records: 10_000,
            max_age_days: 90,
        }
    }
}

/// Bucketing parameters for threshold-vs-success correlation analysis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrelationConfig {
    /// Width of each threshold bucket.
    pub bucket_width: f32,
    /// Minimum flagged samples a bucket needs before it can win.
    pub min_bucket_samples: usize,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            bucket_width: 0.05,
            min_bucket_samples: 3,
        }
    }
}

/// Parameters for the priority-weighted statistical optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatisticalConfig {
    /// How many recent outcome records the optimizer inspects.
    pub recent_window: usize,
    /// Minimum qualifying observations before the weighted average is used.
    pub min_observations: usize,
    /// How many recent thresholds the sparse-data fallback averages.
    pub fallback_window: usize,
}

impl Default for StatisticalConfig {
    fn default() -> Self {
        Self {
            recent_window: 20,
            min_observations: 5,
            fallback_window: 5,
        }
    }
}

/// Parameters for the outcome-trend feedback controller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendConfig {
    /// How many recent impact scores the controller averages.
    pub window: usize,
    /// Mean impact above this band raises the threshold.
    pub surge_threshold: f32,
    /// Mean impact below this band cuts the threshold.
    pub slump_threshold: f32,
    /// Multiplier applied when raising.
    pub raise_factor: f32,
    /// Multiplier applied when cutting.
    pub cut_factor: f32,
    /// Ceiling a raise can reach.
    pub raise_cap: f32,
    /// Floor a cut can reach.
    pub cut_floor: f32,
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window: 10,
            surge_threshold: 0.8,
            slump_threshold: 0.3,
            raise_factor: 1.1,
            cut_factor: 0.8,
            raise_cap: 0.95,
            cut_floor: 0.2,
        }
    }
}

/// Relative weights for blending the two optimizer outputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendWeights {
    pub statistical: f32,
    pub trend: f32,
}

impl Default for BlendWeights {
    fn default() -> Self {
        Self {
            statistical: 0.6,
            trend: 0.4,
        }
    }
}

/// Cold-start behavior when a domain has no history and no caller guidance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Threshold used when nothing else is known about a domain.
    pub neutral_threshold: f32,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            neutral_threshold: 0.5,
        }
    }
}

/// Gating for the caller-facing recommendation report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommendationConfig {
    /// Outcome records required before analysis is attempted.
    pub min_history: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self { min_history: 10 }
    }
}
