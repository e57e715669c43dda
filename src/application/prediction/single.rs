use crate::application::ml::model_adapter::{ModelAdapter, ModelOutput};
use crate::domain::errors::PredictionError;
use crate::domain::ml::confidence::ConfidencePolicy;
use crate::domain::ml::prediction::PredictionResult;
use crate::domain::validation::input_validator::InputValidator;
use crate::domain::validation::raw_record::RawRecord;
use crate::infrastructure::observability::Metrics;
use std::sync::Arc;
use tracing::{info, warn};

pub(crate) const OUTCOME_PREDICTED: &str = "predicted";
pub(crate) const OUTCOME_INVALID: &str = "invalid";
pub(crate) const OUTCOME_MODEL_UNAVAILABLE: &str = "model_unavailable";

/// validate -> predict -> classify for one record.
#[derive(Clone)]
pub struct SinglePredictionService {
    model: Arc<ModelAdapter>,
    policy: ConfidencePolicy,
    metrics: Option<Metrics>,
}

impl SinglePredictionService {
    pub fn new(model: Arc<ModelAdapter>, policy: ConfidencePolicy) -> Self {
        Self {
            model,
            policy,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn model(&self) -> &ModelAdapter {
        &self.model
    }

    pub fn policy(&self) -> ConfidencePolicy {
        self.policy
    }

    /// Either a complete result or a single terminal error.
    pub fn predict_one(&self, raw: &RawRecord) -> Result<PredictionResult, PredictionError> {
        let vector = InputValidator::validate(raw).inspect_err(|e| {
            warn!("Rejected record: {}", e);
            self.record(OUTCOME_INVALID);
        })?;

        let output = self.model.predict(&vector).inspect_err(|_| {
            self.record(OUTCOME_MODEL_UNAVAILABLE);
        })?;

        let result = self.assemble(output);
        self.record(OUTCOME_PREDICTED);
        info!(
            "Prediction made: {}, Probability: {:.3}, Confidence: {}",
            result.label().code(),
            result.probability(),
            result.confidence().as_str()
        );
        Ok(result)
    }

    pub(crate) fn assemble(&self, output: ModelOutput) -> PredictionResult {
        PredictionResult::new(
            output.label,
            output.probability,
            self.policy.classify(output.probability),
        )
    }

    pub(crate) fn record(&self, outcome: &str) {
        if let Some(metrics) = &self.metrics {
            metrics.inc_prediction(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ml::pipeline::{
        PipelineError, PipelineMetadata, PipelineScore, ScoringPipeline,
    };
    use crate::domain::errors::{ModelUnavailable, ValidationReason};
    use crate::domain::ml::confidence::Confidence;
    use crate::domain::ml::feature_vector::FeatureVector;
    use crate::domain::ml::prediction::RiskLabel;

    struct FixedPipeline(f64);

    impl ScoringPipeline for FixedPipeline {
        fn score(&self, batch: &[FeatureVector]) -> Result<Vec<PipelineScore>, PipelineError> {
            Ok(vec![
                PipelineScore {
                    probability: self.0,
                    label: None,
                };
                batch.len()
            ])
        }

        fn metadata(&self) -> PipelineMetadata {
            PipelineMetadata {
                model_type: "fixed".into(),
                version: "0".into(),
                feature_order: vec![],
                training_accuracy: None,
                emits_labels: false,
            }
        }
    }

    fn record() -> RawRecord {
        RawRecord::new()
            .with("age", 55)
            .with("sex", 1)
            .with("cp", 0)
            .with("trestbps", 130)
            .with("chol", 250)
            .with("fbs", 0)
            .with("restecg", 0)
            .with("thalach", 150)
            .with("exang", 0)
            .with("oldpeak", 1.0)
            .with("slope", 1)
            .with("ca", 0)
            .with("thal", 2)
    }

    fn service(probability: f64) -> SinglePredictionService {
        let model = Arc::new(ModelAdapter::ready(Arc::new(FixedPipeline(probability))));
        SinglePredictionService::new(model, ConfidencePolicy::DEFAULT)
            .with_metrics(Metrics::new().unwrap())
    }

    #[test]
    fn test_assembles_full_result() {
        let result = service(0.82).predict_one(&record()).unwrap();
        assert_eq!(result.label(), RiskLabel::AtRisk);
        assert_eq!(result.probability(), 0.82);
        assert_eq!(result.confidence(), Confidence::High);

        let result = service(0.45).predict_one(&record()).unwrap();
        assert_eq!(result.label(), RiskLabel::NoRisk);
        assert_eq!(result.confidence(), Confidence::Low);
    }

    #[test]
    fn test_validation_error_propagates_unchanged() {
        let mut raw = record();
        raw.remove("thalach");
        let err = service(0.9).predict_one(&raw).unwrap_err();
        let validation = err.validation().unwrap();
        assert_eq!(validation.field, "thalach");
        assert_eq!(validation.reason, ValidationReason::Missing);
    }

    #[test]
    fn test_model_unavailable_propagates() {
        let service = SinglePredictionService::new(
            Arc::new(ModelAdapter::unavailable()),
            ConfidencePolicy::DEFAULT,
        );
        assert_eq!(
            service.predict_one(&record()),
            Err(PredictionError::ModelUnavailable(ModelUnavailable))
        );
    }

    #[test]
    fn test_validation_runs_before_model() {
        let service = SinglePredictionService::new(
            Arc::new(ModelAdapter::unavailable()),
            ConfidencePolicy::DEFAULT,
        );
        let err = service.predict_one(&record().with("sex", 7)).unwrap_err();
        assert!(err.validation().is_some());
    }

    #[test]
    fn test_outcomes_are_counted() {
        let metrics = Metrics::new().unwrap();
        let model = Arc::new(ModelAdapter::ready(Arc::new(FixedPipeline(0.3))));
        let service =
            SinglePredictionService::new(model, ConfidencePolicy::DEFAULT).with_metrics(metrics.clone());

        service.predict_one(&record()).unwrap();
        let _ = service.predict_one(&record().with("age", "x"));

        assert_eq!(metrics.predictions(OUTCOME_PREDICTED), 1);
        assert_eq!(metrics.predictions(OUTCOME_INVALID), 1);
    }
}
