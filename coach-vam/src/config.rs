//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

use coach_core::{CoachError, Result};

/// Answer-cache sizing and admission policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Maximum number of cached responses before oldest-first eviction.
    pub capacity: usize,
    /// When true, only verified responses are admitted.
    pub verified_only: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self { capacity: 256, verified_only: true }
    }
}

/// Configuration for the Verified Answer Mode orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VamConfig {
    /// Trust scores at or above this mark a response verified.
    pub trust_threshold: f64,
    /// Whether to try a canonical solution before retrieval + generation.
    pub canonical_first: bool,
    /// Maximum corrective-decode passes after the first generation.
    pub max_retries: u32,
    /// Sampling temperature for corrective passes.
    pub corrective_temperature: f64,
    /// Maximum study suggestions attached to an abstention.
    pub max_suggestions: usize,
    /// Answer-cache policy.
    pub cache: CacheConfig,
}

impl Default for VamConfig {
    fn default() -> Self {
        Self {
            trust_threshold: 0.92,
            canonical_first: true,
            max_retries: 1,
            corrective_temperature: 0.2,
            max_suggestions: 3,
            cache: CacheConfig::default(),
        }
    }
}

impl VamConfig {
    /// Create a new builder for constructing a [`VamConfig`].
    pub fn builder() -> VamConfigBuilder {
        VamConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`VamConfig`].
#[derive(Debug, Clone, Default)]
pub struct VamConfigBuilder {
    config: VamConfig,
}

impl VamConfigBuilder {
    /// Set the verification trust threshold.
    pub fn trust_threshold(mut self, threshold: f64) -> Self {
        self.config.trust_threshold = threshold;
        self
    }

    /// Enable or disable the canonical-first stage.
    pub fn canonical_first(mut self, enabled: bool) -> Self {
        self.config.canonical_first = enabled;
        self
    }

    /// Set the corrective-decode retry budget.
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set the corrective-pass sampling temperature.
    pub fn corrective_temperature(mut self, temperature: f64) -> Self {
        self.config.corrective_temperature = temperature;
        self
    }

    /// Set the maximum abstention suggestion count.
    pub fn max_suggestions(mut self, count: usize) -> Self {
        self.config.max_suggestions = count;
        self
    }

    /// Set the answer-cache policy.
    pub fn cache(mut self, cache: CacheConfig) -> Self {
        self.config.cache = cache;
        self
    }

    /// Build the [`VamConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::Config`] if the trust threshold is outside
    /// (0, 1], the corrective temperature is outside [0, 2], no suggestions
    /// are allowed, or the cache capacity is zero.
    pub fn build(self) -> Result<VamConfig> {
        let config = self.config;
        if !(config.trust_threshold > 0.0 && config.trust_threshold <= 1.0) {
            return Err(CoachError::Config(format!(
                "trust_threshold ({}) must be within (0, 1]",
                config.trust_threshold
            )));
        }
        if !(0.0..=2.0).contains(&config.corrective_temperature) {
            return Err(CoachError::Config(format!(
                "corrective_temperature ({}) must be within [0, 2]",
                config.corrective_temperature
            )));
        }
        if config.max_suggestions == 0 {
            return Err(CoachError::Config(
                "max_suggestions must be greater than zero".into(),
            ));
        }
        if config.cache.capacity == 0 {
            return Err(CoachError::Config("cache capacity must be greater than zero".into()));
        }
        Ok(config)
    }
}
