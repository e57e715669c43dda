use crate::domain::ml::feature_vector::FeatureVector;
use crate::domain::ml::prediction::RiskLabel;
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Raw output of a pipeline for one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineScore {
    /// Probability of the positive class.
    pub probability: f64,
    /// The pipeline's own decision, when it makes one.
    pub label: Option<RiskLabel>,
}

/// Descriptive metadata published by a loaded pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineMetadata {
    pub model_type: String,
    pub version: String,
    pub feature_order: Vec<String>,
    pub training_accuracy: Option<f64>,
    pub emits_labels: bool,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to read pipeline artifact {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse pipeline artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid pipeline artifact: {0}")]
    InvalidArtifact(String),

    #[error("scoring failed: {0}")]
    Scoring(String),
}

/// Interface for pre-trained scoring pipelines.
///
/// Implementations are immutable after construction and shared across
/// threads, so `score` takes `&self` and must not need a lock.
pub trait ScoringPipeline: Send + Sync {
    /// Scores every vector of the batch, returning one entry per vector in
    /// the same order. A row's score must not depend on the other rows.
    fn score(&self, batch: &[FeatureVector]) -> Result<Vec<PipelineScore>, PipelineError>;

    fn metadata(&self) -> PipelineMetadata;
}
