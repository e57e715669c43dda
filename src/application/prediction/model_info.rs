use super::batch::MAX_BATCH_SIZE;
use crate::application::ml::model_adapter::ModelAdapter;
use crate::domain::errors::ModelUnavailable;
use crate::domain::ml::confidence::ConfidencePolicy;
use crate::domain::ml::feature_schema::{FEATURE_COUNT, FEATURE_SCHEMA, FieldSpec};
use crate::domain::ml::prediction::RiskLabel;
use serde::Serialize;
use std::collections::BTreeMap;

/// Read-only description of the accepted input and the loaded pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub version: String,
    pub num_features: usize,
    pub feature_order: Vec<String>,
    pub features: Vec<FieldSpec>,
    pub target_classes: Vec<u8>,
    pub target_description: BTreeMap<u8, &'static str>,
    pub training_accuracy: Option<f64>,
    /// `None` when the pipeline labels rows itself.
    pub decision_threshold: Option<f64>,
    pub confidence_policy: ConfidencePolicy,
    pub max_batch_size: usize,
}

impl ModelInfo {
    pub fn describe(
        model: &ModelAdapter,
        policy: ConfidencePolicy,
    ) -> Result<Self, ModelUnavailable> {
        let metadata = model.metadata()?;
        let labels = [RiskLabel::NoRisk, RiskLabel::AtRisk];

        Ok(Self {
            model_type: metadata.model_type,
            version: metadata.version,
            num_features: FEATURE_COUNT,
            feature_order: metadata.feature_order,
            features: FEATURE_SCHEMA.to_vec(),
            target_classes: labels.iter().map(|l| l.code()).collect(),
            target_description: labels.iter().map(|l| (l.code(), l.description())).collect(),
            training_accuracy: metadata.training_accuracy,
            decision_threshold: (!metadata.emits_labels).then(|| model.decision_threshold()),
            confidence_policy: policy,
            max_batch_size: MAX_BATCH_SIZE,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Healthy,
    Degraded,
}

/// Whether the process-wide model was initialised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthStatus {
    pub status: ServiceStatus,
    pub model_loaded: bool,
    pub model_version: Option<String>,
}

impl HealthStatus {
    pub fn check(model: &ModelAdapter) -> Self {
        match model.metadata() {
            Ok(metadata) => Self {
                status: ServiceStatus::Healthy,
                model_loaded: true,
                model_version: Some(metadata.version),
            },
            Err(ModelUnavailable) => Self {
                status: ServiceStatus::Degraded,
                model_loaded: false,
                model_version: None,
            },
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == ServiceStatus::Healthy
    }
}
