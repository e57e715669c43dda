//! Push-based observability
//!
//! Metrics live in a private Prometheus registry and are rendered on demand
//! (the CLI prints them with `--metrics`). Nothing listens for requests.

pub mod metrics;

pub use metrics::Metrics;
