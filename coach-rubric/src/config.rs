//! Rubric configuration.

use serde::{Deserialize, Serialize};

use coach_core::{CoachError, ExamVariant, Result};

/// Score adjustments per violation severity and quality signal.
///
/// These are tuning heuristics, exposed as configuration rather than
/// hard-coded so deployments can recalibrate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    /// Deducted per error violation.
    pub error: f64,
    /// Deducted per warning violation.
    pub warning: f64,
    /// Deducted per info violation.
    pub info: f64,
    /// Added per recognized quality signal.
    pub quality: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self { error: 0.2, warning: 0.1, info: 0.05, quality: 0.1 }
    }
}

/// Configuration for the rubric postprocessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricConfig {
    /// Significant figures for numeric rounding.
    pub significant_figures: u32,
    /// When set, round to fixed decimal places instead of significant figures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decimal_places: Option<u32>,
    /// Magnitudes at or above this are rewritten in scientific notation.
    pub scientific_threshold: f64,
    /// Minimum acceptable parsed step count.
    pub min_steps: usize,
    /// The exam variant whose series content requires a convergence
    /// justification.
    pub series_variant: ExamVariant,
    /// Score adjustments.
    pub weights: ScoreWeights,
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            significant_figures: 3,
            decimal_places: None,
            scientific_threshold: 1e6,
            min_steps: 2,
            series_variant: ExamVariant::CalcBc,
            weights: ScoreWeights::default(),
        }
    }
}

impl RubricConfig {
    /// Create a new builder for constructing a [`RubricConfig`].
    pub fn builder() -> RubricConfigBuilder {
        RubricConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RubricConfig`].
#[derive(Debug, Clone, Default)]
pub struct RubricConfigBuilder {
    config: RubricConfig,
}

impl RubricConfigBuilder {
    /// Set the significant figures for numeric rounding.
    pub fn significant_figures(mut self, figures: u32) -> Self {
        self.config.significant_figures = figures;
        self
    }

    /// Round to fixed decimal places instead of significant figures.
    pub fn decimal_places(mut self, places: u32) -> Self {
        self.config.decimal_places = Some(places);
        self
    }

    /// Set the scientific-notation threshold.
    pub fn scientific_threshold(mut self, threshold: f64) -> Self {
        self.config.scientific_threshold = threshold;
        self
    }

    /// Set the minimum acceptable step count.
    pub fn min_steps(mut self, min_steps: usize) -> Self {
        self.config.min_steps = min_steps;
        self
    }

    /// Set the score adjustment weights.
    pub fn weights(mut self, weights: ScoreWeights) -> Self {
        self.config.weights = weights;
        self
    }

    /// Build the [`RubricConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`CoachError::Config`] if `significant_figures == 0` or the
    /// scientific threshold is not positive.
    pub fn build(self) -> Result<RubricConfig> {
        if self.config.significant_figures == 0 {
            return Err(CoachError::Config(
                "significant_figures must be greater than zero".into(),
            ));
        }
        if self.config.scientific_threshold <= 0.0 {
            return Err(CoachError::Config("scientific_threshold must be positive".into()));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RubricConfig::default();
        assert_eq!(config.significant_figures, 3);
        assert_eq!(config.min_steps, 2);
        assert_eq!(config.series_variant, ExamVariant::CalcBc);
    }

    #[test]
    fn builder_rejects_zero_significant_figures() {
        assert!(RubricConfig::builder().significant_figures(0).build().is_err());
    }

    #[test]
    fn builder_rejects_nonpositive_threshold() {
        assert!(RubricConfig::builder().scientific_threshold(0.0).build().is_err());
    }
}
