use crate::application::ml::model_adapter::DECISION_THRESHOLD;
use crate::domain::ml::confidence::{ConfidencePolicy, DEFAULT_LOW_BAND, DEFAULT_MEDIUM_BAND};
use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MODEL_PATH: &str = "models/logistic_pipeline.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub model_path: PathBuf,
    pub confidence_policy: ConfidencePolicy,
    /// Only used when the pipeline does not label rows itself.
    pub decision_threshold: f64,
    pub metrics_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            confidence_policy: ConfidencePolicy::DEFAULT,
            decision_threshold: DECISION_THRESHOLD,
            metrics_enabled: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let model_path = lookup("MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MODEL_PATH));

        let low_band = lookup("CONFIDENCE_LOW_BAND")
            .unwrap_or_else(|| DEFAULT_LOW_BAND.to_string())
            .parse::<f64>()
            .context("Failed to parse CONFIDENCE_LOW_BAND")?;

        let medium_band = lookup("CONFIDENCE_MEDIUM_BAND")
            .unwrap_or_else(|| DEFAULT_MEDIUM_BAND.to_string())
            .parse::<f64>()
            .context("Failed to parse CONFIDENCE_MEDIUM_BAND")?;

        let confidence_policy = ConfidencePolicy::new(low_band, medium_band)
            .context("Invalid CONFIDENCE_LOW_BAND / CONFIDENCE_MEDIUM_BAND")?;

        let decision_threshold = lookup("DECISION_THRESHOLD")
            .unwrap_or_else(|| DECISION_THRESHOLD.to_string())
            .parse::<f64>()
            .context("Failed to parse DECISION_THRESHOLD")?;
        if !(decision_threshold > 0.0 && decision_threshold < 1.0) {
            anyhow::bail!(
                "Invalid DECISION_THRESHOLD: {}. Must lie strictly between 0 and 1",
                decision_threshold
            );
        }

        let metrics_enabled = lookup("METRICS_ENABLED")
            .unwrap_or_else(|| "true".to_string())
            .parse::<bool>()
            .unwrap_or(true);

        Ok(Self {
            model_path,
            confidence_policy,
            decision_threshold,
            metrics_enabled,
        })
    }
}
