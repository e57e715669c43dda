use super::pipeline::{PipelineError, PipelineMetadata, PipelineScore, ScoringPipeline};
use crate::domain::ml::feature_schema::{FEATURE_COUNT, feature_names};
use crate::domain::ml::feature_vector::FeatureVector;
use crate::domain::ml::prediction::RiskLabel;
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Standard scaler parameters, one entry per feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerParams {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

/// On-disk form of a scaler + logistic regression pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineArtifact {
    pub model_type: String,
    pub version: String,
    pub feature_order: Vec<String>,
    pub scaler: ScalerParams,
    pub coefficients: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub emits_labels: bool,
    #[serde(default)]
    pub training_accuracy: Option<f64>,
}

/// Standardise, then apply a linear model and the logistic link.
pub struct LogisticPipeline {
    mean: Array1<f64>,
    scale: Array1<f64>,
    coefficients: Array1<f64>,
    intercept: f64,
    emits_labels: bool,
    metadata: PipelineMetadata,
}

impl LogisticPipeline {
    pub fn from_file(path: &Path) -> Result<Self, PipelineError> {
        let raw = fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let pipeline = Self::from_json(&raw)?;
        info!(
            "Loaded {} {} from {:?}",
            pipeline.metadata.model_type, pipeline.metadata.version, path
        );
        Ok(pipeline)
    }

    pub fn from_json(raw: &str) -> Result<Self, PipelineError> {
        let artifact: PipelineArtifact = serde_json::from_str(raw)?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: PipelineArtifact) -> Result<Self, PipelineError> {
        let expected = feature_names();
        if artifact.feature_order != expected {
            return Err(PipelineError::InvalidArtifact(format!(
                "feature order {:?} does not match schema {:?}",
                artifact.feature_order, expected
            )));
        }

        for (name, values) in [
            ("scaler.mean", &artifact.scaler.mean),
            ("scaler.scale", &artifact.scaler.scale),
            ("coefficients", &artifact.coefficients),
        ] {
            if values.len() != FEATURE_COUNT {
                return Err(PipelineError::InvalidArtifact(format!(
                    "{name} has {} entries, expected {FEATURE_COUNT}",
                    values.len()
                )));
            }
            if values.iter().any(|v| !v.is_finite()) {
                return Err(PipelineError::InvalidArtifact(format!(
                    "{name} contains non-finite values"
                )));
            }
        }
        if artifact.scaler.scale.iter().any(|s| *s == 0.0) {
            return Err(PipelineError::InvalidArtifact(
                "scaler.scale contains zero".to_string(),
            ));
        }
        if !artifact.intercept.is_finite() {
            return Err(PipelineError::InvalidArtifact(
                "intercept is not finite".to_string(),
            ));
        }

        let metadata = PipelineMetadata {
            model_type: artifact.model_type,
            version: artifact.version,
            feature_order: artifact.feature_order,
            training_accuracy: artifact.training_accuracy,
            emits_labels: artifact.emits_labels,
        };

        Ok(Self {
            mean: Array1::from(artifact.scaler.mean),
            scale: Array1::from(artifact.scaler.scale),
            coefficients: Array1::from(artifact.coefficients),
            intercept: artifact.intercept,
            emits_labels: artifact.emits_labels,
            metadata,
        })
    }

    /// Linear score `z = standardised(x) . w + b` for every row.
    fn decision_function(&self, batch: &[FeatureVector]) -> Result<Vec<f64>, PipelineError> {
        let flat: Vec<f64> = batch
            .iter()
            .flat_map(|v| v.as_array().iter().copied())
            .collect();
        let x = Array2::from_shape_vec((batch.len(), FEATURE_COUNT), flat)
            .map_err(|e| PipelineError::Scoring(format!("Matrix creation failed: {}", e)))?;

        let standardized = (&x - &self.mean) / &self.scale;

        // Row-wise dot keeps each row's arithmetic independent of batch size
        Ok(standardized
            .rows()
            .into_iter()
            .map(|row| row.dot(&self.coefficients) + self.intercept)
            .collect())
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

impl ScoringPipeline for LogisticPipeline {
    fn score(&self, batch: &[FeatureVector]) -> Result<Vec<PipelineScore>, PipelineError> {
        if batch.is_empty() {
            return Ok(Vec::new());
        }
        let scores = self
            .decision_function(batch)?
            .into_iter()
            .map(|z| PipelineScore {
                probability: sigmoid(z),
                label: self.emits_labels.then(|| {
                    if z > 0.0 {
                        RiskLabel::AtRisk
                    } else {
                        RiskLabel::NoRisk
                    }
                }),
            })
            .collect();
        Ok(scores)
    }

    fn metadata(&self) -> PipelineMetadata {
        self.metadata.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::input_validator::InputValidator;
    use crate::domain::validation::raw_record::RawRecord;

    fn artifact() -> PipelineArtifact {
        PipelineArtifact {
            model_type: "logistic_regression".to_string(),
            version: "test".to_string(),
            feature_order: feature_names().into_iter().map(String::from).collect(),
            scaler: ScalerParams {
                mean: vec![0.0; FEATURE_COUNT],
                scale: vec![1.0; FEATURE_COUNT],
            },
            coefficients: vec![0.0; FEATURE_COUNT],
            intercept: 0.0,
            emits_labels: true,
            training_accuracy: Some(0.85),
        }
    }

    fn vector(age: f64) -> FeatureVector {
        let record = RawRecord::new()
            .with("age", age)
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
            .with("thal", 2);
        InputValidator::validate(&record).unwrap()
    }

    #[test]
    fn test_zero_model_is_neutral() {
        let pipeline = LogisticPipeline::from_artifact(artifact()).unwrap();
        let scores = pipeline.score(&[vector(55.0)]).unwrap();
        assert_eq!(scores[0].probability, 0.5);
        assert_eq!(scores[0].label, Some(RiskLabel::NoRisk));
    }

    #[test]
    fn test_standardisation_and_link() {
        let mut a = artifact();
        a.scaler.mean[0] = 50.0;
        a.scaler.scale[0] = 10.0;
        a.coefficients[0] = 2.0;
        let pipeline = LogisticPipeline::from_artifact(a).unwrap();

        // (60 - 50) / 10 * 2 = 2
        let scores = pipeline.score(&[vector(60.0), vector(40.0)]).unwrap();
        assert!((scores[0].probability - sigmoid(2.0)).abs() < 1e-12);
        assert!((scores[1].probability - sigmoid(-2.0)).abs() < 1e-12);
        assert_eq!(scores[0].label, Some(RiskLabel::AtRisk));
        assert_eq!(scores[1].label, Some(RiskLabel::NoRisk));
    }

    #[test]
    fn test_batch_matches_single_rows() {
        let mut a = artifact();
        a.coefficients = vec![0.3, -0.7, 0.9, -0.02, 0.004, 0.1, 0.2, 0.03, -0.5, -0.6, 0.4, -0.8, -0.5];
        let pipeline = LogisticPipeline::from_artifact(a).unwrap();

        let batch: Vec<FeatureVector> = (0..7).map(|i| vector(30.0 + i as f64 * 7.5)).collect();
        let together = pipeline.score(&batch).unwrap();
        for (v, joint) in batch.iter().zip(together.iter()) {
            let alone = pipeline.score(std::slice::from_ref(v)).unwrap();
            assert_eq!(alone[0].probability.to_bits(), joint.probability.to_bits());
        }
    }

    #[test]
    fn test_labels_omitted_when_not_emitted() {
        let mut a = artifact();
        a.emits_labels = false;
        let pipeline = LogisticPipeline::from_artifact(a).unwrap();
        assert_eq!(pipeline.score(&[vector(55.0)]).unwrap()[0].label, None);
        assert!(pipeline.score(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_bad_artifacts() {
        let mut a = artifact();
        a.feature_order.swap(0, 1);
        assert!(matches!(
            LogisticPipeline::from_artifact(a),
            Err(PipelineError::InvalidArtifact(_))
        ));

        let mut a = artifact();
        a.coefficients.pop();
        assert!(LogisticPipeline::from_artifact(a).is_err());

        let mut a = artifact();
        a.scaler.scale[3] = 0.0;
        assert!(LogisticPipeline::from_artifact(a).is_err());

        let mut a = artifact();
        a.scaler.mean[2] = f64::NAN;
        assert!(LogisticPipeline::from_artifact(a).is_err());

        assert!(matches!(
            LogisticPipeline::from_json("{not json"),
            Err(PipelineError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = LogisticPipeline::from_file(Path::new("does/not/exist.json"))
            .err()
            .unwrap();
        assert!(matches!(err, PipelineError::Io { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert_eq!(sigmoid(0.0), 0.5);
    }
}
