//! Prometheus metrics definitions for the prediction service
//!
//! All metrics use the `hyperrisk_` prefix. Counters are atomic, so
//! recording never blocks a prediction.

use prometheus::{
    Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Prometheus metrics for the prediction pipeline
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
    /// Scored records by outcome (predicted, invalid, model_unavailable)
    pub predictions_total: IntCounterVec,
    /// Batches by status (accepted, rejected)
    pub batches_total: IntCounterVec,
    /// Rows per accepted batch
    pub batch_rows: Histogram,
}

impl Metrics {
    /// Create a new Metrics instance with all counters registered
    pub fn new() -> anyhow::Result<Self> {
        let registry = Registry::new();

        let predictions_total = IntCounterVec::new(
            Opts::new(
                "hyperrisk_predictions_total",
                "Scored records by outcome",
            ),
            &["outcome"],
        )?;
        registry.register(Box::new(predictions_total.clone()))?;

        let batches_total = IntCounterVec::new(
            Opts::new("hyperrisk_batches_total", "Batch requests by status"),
            &["status"],
        )?;
        registry.register(Box::new(batches_total.clone()))?;

        let batch_rows = Histogram::with_opts(
            HistogramOpts::new("hyperrisk_batch_rows", "Rows per accepted batch")
                .buckets(vec![1.0, 5.0, 10.0, 25.0, 50.0, 75.0, 100.0]),
        )?;
        registry.register(Box::new(batch_rows.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            predictions_total,
            batches_total,
            batch_rows,
        })
    }

    /// Render all metrics in Prometheus text format
    pub fn render(&self) -> String {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        encoder
            .encode_to_string(&metric_families)
            .unwrap_or_default()
    }

    /// Increment the per-record outcome counter
    pub fn inc_prediction(&self, outcome: &str) {
        self.predictions_total.with_label_values(&[outcome]).inc();
    }

    pub fn inc_batch(&self, status: &str) {
        self.batches_total.with_label_values(&[status]).inc();
    }

    pub fn observe_batch_rows(&self, rows: usize) {
        self.batch_rows.observe(rows as f64);
    }

    pub fn predictions(&self, outcome: &str) -> u64 {
        self.predictions_total.with_label_values(&[outcome]).get()
    }

    pub fn batches(&self, status: &str) -> u64 {
        self.batches_total.with_label_values(&[status]).get()
    }
}
