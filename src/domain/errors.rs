use serde::Serialize;
use thiserror::Error;

/// Why a single field was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationReason {
    #[error("missing")]
    Missing,

    #[error("wrong type: expected {expected}")]
    WrongType { expected: &'static str },

    #[error("out of domain: {detail}")]
    OutOfDomain { detail: String },
}

/// First failing field of a raw record, in schema order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid field `{field}`: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: ValidationReason,
}

impl ValidationError {
    pub fn new(field: &'static str, reason: ValidationReason) -> Self {
        Self { field, reason }
    }
}

/// Batch rejected wholesale before any row was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("batch size {received} outside accepted range 1..={limit}")]
pub struct BatchSizeError {
    pub limit: usize,
    pub received: usize,
}

/// The model could not be loaded or stopped producing usable output.
///
/// Carries no detail: the cause is logged where it happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[error("prediction model is unavailable")]
pub struct ModelUnavailable;

/// Terminal error of a single prediction.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "error", rename_all = "snake_case")]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    ModelUnavailable(#[from] ModelUnavailable),
}

impl PredictionError {
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            PredictionError::Validation(err) => Some(err),
            PredictionError::ModelUnavailable(_) => None,
        }
    }

    pub fn is_model_unavailable(&self) -> bool {
        matches!(self, PredictionError::ModelUnavailable(_))
    }
}
