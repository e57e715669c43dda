use super::single::{
    OUTCOME_INVALID, OUTCOME_MODEL_UNAVAILABLE, OUTCOME_PREDICTED, SinglePredictionService,
};
use crate::domain::errors::{BatchSizeError, ModelUnavailable, PredictionError};
use crate::domain::ml::feature_vector::FeatureVector;
use crate::domain::ml::prediction::{BatchItemResult, BatchResult};
use crate::domain::validation::input_validator::InputValidator;
use crate::domain::validation::raw_record::RawRecord;
use crate::infrastructure::observability::Metrics;
use tracing::{info, instrument, warn};

/// Largest batch accepted in one request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Scores up to `MAX_BATCH_SIZE` records with per-row failure isolation.
///
/// Valid rows are scored together in one `predict_many` call and the
/// outputs are put back at their original positions, so the result is the
/// same as running `predict_one` row by row.
#[derive(Clone)]
pub struct BatchPredictionService {
    single: SinglePredictionService,
    metrics: Option<Metrics>,
}

impl BatchPredictionService {
    pub fn new(single: SinglePredictionService) -> Self {
        Self {
            single,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Fails wholesale only on size; every other problem is reported per row.
    #[instrument(skip_all, fields(rows = rows.len()))]
    pub fn predict_batch(&self, rows: &[RawRecord]) -> Result<BatchResult, BatchSizeError> {
        if rows.is_empty() || rows.len() > MAX_BATCH_SIZE {
            warn!(
                "Batch rejected: {} rows (limit {})",
                rows.len(),
                MAX_BATCH_SIZE
            );
            if let Some(metrics) = &self.metrics {
                metrics.inc_batch("rejected");
            }
            return Err(BatchSizeError {
                limit: MAX_BATCH_SIZE,
                received: rows.len(),
            });
        }
        if let Some(metrics) = &self.metrics {
            metrics.inc_batch("accepted");
            metrics.observe_batch_rows(rows.len());
        }

        let validated: Vec<Result<FeatureVector, PredictionError>> = rows
            .iter()
            .map(|raw| InputValidator::validate(raw).map_err(PredictionError::from))
            .collect();

        let vectors: Vec<FeatureVector> = validated
            .iter()
            .filter_map(|slot| slot.as_ref().ok().copied())
            .collect();

        let mut outputs = match self.single.model().predict_many(&vectors) {
            Ok(outputs) => outputs
                .into_iter()
                .map(|output| output.map_err(PredictionError::from))
                .collect::<Vec<_>>(),
            Err(unavailable) => vec![Err(PredictionError::from(unavailable)); vectors.len()],
        }
        .into_iter();

        let mut items = Vec::with_capacity(rows.len());
        for (index, slot) in validated.into_iter().enumerate() {
            let scored = slot.and_then(|_| outputs.next().unwrap_or(Err(ModelUnavailable.into())));
            let item = match scored {
                Ok(output) => {
                    self.single.record(OUTCOME_PREDICTED);
                    BatchItemResult::Predicted {
                        index,
                        result: self.single.assemble(output),
                    }
                }
                Err(error) => {
                    self.single.record(match error {
                        PredictionError::Validation(_) => OUTCOME_INVALID,
                        PredictionError::ModelUnavailable(_) => OUTCOME_MODEL_UNAVAILABLE,
                    });
                    BatchItemResult::Failed { index, error }
                }
            };
            items.push(item);
        }

        let result = BatchResult::new(items);
        info!(
            "Batch prediction completed: {} rows, {} predicted, {} failed",
            result.len(),
            result.predicted_count(),
            result.failed_count()
        );
        Ok(result)
    }
}
