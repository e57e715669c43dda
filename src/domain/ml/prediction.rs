use super::confidence::Confidence;
use crate::domain::errors::PredictionError;
use serde::Serialize;

/// Binary outcome of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "u8")]
pub enum RiskLabel {
    NoRisk = 0,
    AtRisk = 1,
}

impl RiskLabel {
    /// Applies `probability > threshold` as the decision rule.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        if probability > threshold {
            RiskLabel::AtRisk
        } else {
            RiskLabel::NoRisk
        }
    }

    pub fn code(&self) -> u8 {
        *self as u8
    }

    pub fn description(&self) -> &'static str {
        match self {
            RiskLabel::NoRisk => "no risk",
            RiskLabel::AtRisk => "at risk",
        }
    }
}

impl From<RiskLabel> for u8 {
    fn from(label: RiskLabel) -> Self {
        label.code()
    }
}

/// Scored record. Assembled once by the prediction service and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    label: RiskLabel,
    probability: f64,
    confidence: Confidence,
}

impl PredictionResult {
    pub(crate) fn new(label: RiskLabel, probability: f64, confidence: Confidence) -> Self {
        Self {
            label,
            probability,
            confidence,
        }
    }

    pub fn label(&self) -> RiskLabel {
        self.label
    }

    /// Estimated probability of the positive ("at risk") class.
    pub fn probability(&self) -> f64 {
        self.probability
    }

    pub fn confidence(&self) -> Confidence {
        self.confidence
    }
}

/// Outcome of one row of a batch, tied to its input position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BatchItemResult {
    Predicted {
        index: usize,
        #[serde(flatten)]
        result: PredictionResult,
    },
    Failed {
        index: usize,
        error: PredictionError,
    },
}

impl BatchItemResult {
    pub fn index(&self) -> usize {
        match self {
            BatchItemResult::Predicted { index, .. } | BatchItemResult::Failed { index, .. } => {
                *index
            }
        }
    }

    pub fn prediction(&self) -> Option<&PredictionResult> {
        match self {
            BatchItemResult::Predicted { result, .. } => Some(result),
            BatchItemResult::Failed { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&PredictionError> {
        match self {
            BatchItemResult::Predicted { .. } => None,
            BatchItemResult::Failed { error, .. } => Some(error),
        }
    }

    pub fn is_predicted(&self) -> bool {
        matches!(self, BatchItemResult::Predicted { .. })
    }
}

/// Index-aligned outcomes of a batch: `items[i]` belongs to input row `i`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    #[serde(rename = "results")]
    items: Vec<BatchItemResult>,
}

impl BatchResult {
    pub(crate) fn new(items: Vec<BatchItemResult>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[BatchItemResult] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BatchItemResult> {
        self.items.iter()
    }

    pub fn predicted_count(&self) -> usize {
        self.items.iter().filter(|item| item.is_predicted()).count()
    }

    pub fn failed_count(&self) -> usize {
        self.len() - self.predicted_count()
    }

    pub fn into_items(self) -> Vec<BatchItemResult> {
        self.items
    }
}
