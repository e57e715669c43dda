use super::logistic_pipeline::LogisticPipeline;
use super::pipeline::{PipelineMetadata, ScoringPipeline};
use crate::domain::errors::ModelUnavailable;
use crate::domain::ml::feature_vector::FeatureVector;
use crate::domain::ml::prediction::RiskLabel;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Probability above which a record is labelled "at risk" when the
/// pipeline does not make its own decision.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Label and probability for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelOutput {
    pub label: RiskLabel,
    pub probability: f64,
}

enum ModelState {
    Ready(Arc<dyn ScoringPipeline>),
    Unavailable,
}

/// Process-wide, read-only handle to the loaded pipeline.
///
/// Built once at startup. A failed load leaves the adapter `Unavailable`
/// for its whole lifetime; every call then fails with `ModelUnavailable`.
pub struct ModelAdapter {
    state: ModelState,
    decision_threshold: f64,
}

impl ModelAdapter {
    pub fn ready(pipeline: Arc<dyn ScoringPipeline>) -> Self {
        Self {
            state: ModelState::Ready(pipeline),
            decision_threshold: DECISION_THRESHOLD,
        }
    }

    pub fn unavailable() -> Self {
        Self {
            state: ModelState::Unavailable,
            decision_threshold: DECISION_THRESHOLD,
        }
    }

    /// Loads the logistic pipeline artifact at `path`.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!(
                "Model artifact not found at {:?}. Predictions will be refused.",
                path
            );
            return Self::unavailable();
        }

        match LogisticPipeline::from_file(path) {
            Ok(pipeline) => {
                info!("Model ready ({:?})", path);
                Self::ready(Arc::new(pipeline))
            }
            Err(e) => {
                error!("Failed to load model: {}", e);
                Self::unavailable()
            }
        }
    }

    pub fn with_decision_threshold(mut self, threshold: f64) -> Self {
        self.decision_threshold = threshold;
        self
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.state, ModelState::Ready(_))
    }

    /// Threshold applied when the pipeline does not label rows itself.
    pub fn decision_threshold(&self) -> f64 {
        self.decision_threshold
    }

    pub fn metadata(&self) -> Result<PipelineMetadata, ModelUnavailable> {
        Ok(self.pipeline()?.metadata())
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<ModelOutput, ModelUnavailable> {
        self.predict_many(std::slice::from_ref(vector))?
            .into_iter()
            .next()
            .unwrap_or(Err(ModelUnavailable))
    }

    /// Scores all vectors in one pipeline call. Equivalent to calling
    /// `predict` on each vector in turn.
    ///
    /// The outer error covers the whole call (no pipeline, scoring failed,
    /// wrong number of scores). An unusable score only fails its own slot.
    pub fn predict_many(
        &self,
        vectors: &[FeatureVector],
    ) -> Result<Vec<Result<ModelOutput, ModelUnavailable>>, ModelUnavailable> {
        let pipeline = self.pipeline()?;
        if vectors.is_empty() {
            return Ok(Vec::new());
        }

        let scores = pipeline.score(vectors).map_err(|e| {
            error!("Pipeline scoring failed: {}", e);
            ModelUnavailable
        })?;

        if scores.len() != vectors.len() {
            error!(
                "Pipeline returned {} scores for {} vectors",
                scores.len(),
                vectors.len()
            );
            return Err(ModelUnavailable);
        }

        Ok(scores
            .into_iter()
            .enumerate()
            .map(|(row, score)| {
                if !(0.0..=1.0).contains(&score.probability) {
                    error!(
                        "Pipeline returned probability {} for row {}",
                        score.probability, row
                    );
                    return Err(ModelUnavailable);
                }
                let label = score.label.unwrap_or_else(|| {
                    RiskLabel::from_probability(score.probability, self.decision_threshold)
                });
                Ok(ModelOutput {
                    label,
                    probability: score.probability,
                })
            })
            .collect())
    }

    fn pipeline(&self) -> Result<&Arc<dyn ScoringPipeline>, ModelUnavailable> {
        match &self.state {
            ModelState::Ready(pipeline) => Ok(pipeline),
            ModelState::Unavailable => Err(ModelUnavailable),
        }
    }
}
