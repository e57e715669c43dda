use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

use crate::application::ml::model_adapter::ModelAdapter;
use crate::application::prediction::batch::BatchPredictionService;
use crate::application::prediction::model_info::{HealthStatus, ModelInfo};
use crate::application::prediction::single::SinglePredictionService;
use crate::config::Config;
use crate::domain::errors::ModelUnavailable;
use crate::infrastructure::observability::Metrics;

/// Process-wide prediction state: built once by `start`, read-only until
/// `shutdown`.
pub struct PredictionRuntime {
    pub config: Config,
    pub model: Arc<ModelAdapter>,
    pub single: SinglePredictionService,
    pub batch: BatchPredictionService,
    pub metrics: Option<Metrics>,
}

impl PredictionRuntime {
    /// Loads the model from `config.model_path` and wires the services.
    ///
    /// A model that fails to load does not stop the runtime; it starts
    /// degraded and refuses predictions.
    pub fn start(config: Config) -> Result<Self> {
        info!("Loading model from {:?}...", config.model_path);
        let model = ModelAdapter::load(&config.model_path)
            .with_decision_threshold(config.decision_threshold);
        Self::with_model(config, model)
    }

    /// Wires the services around an already-built adapter.
    pub fn with_model(config: Config, model: ModelAdapter) -> Result<Self> {
        let metrics = if config.metrics_enabled {
            Some(Metrics::new()?)
        } else {
            None
        };

        let model = Arc::new(model);
        let mut single = SinglePredictionService::new(model.clone(), config.confidence_policy);
        if let Some(metrics) = &metrics {
            single = single.with_metrics(metrics.clone());
        }
        let mut batch = BatchPredictionService::new(single.clone());
        if let Some(metrics) = &metrics {
            batch = batch.with_metrics(metrics.clone());
        }

        if model.is_ready() {
            info!("Prediction runtime ready.");
        } else {
            warn!("Prediction runtime started DEGRADED: model unavailable.");
        }

        Ok(Self {
            config,
            model,
            single,
            batch,
            metrics,
        })
    }

    pub fn health(&self) -> HealthStatus {
        HealthStatus::check(&self.model)
    }

    pub fn model_info(&self) -> Result<ModelInfo, ModelUnavailable> {
        ModelInfo::describe(&self.model, self.config.confidence_policy)
    }

    /// Teardown. Releases the model and the services.
    pub fn shutdown(self) {
        let healthy = self.model.is_ready();
        drop(self);
        info!("Prediction runtime shut down (model was loaded: {}).", healthy);
    }
}
