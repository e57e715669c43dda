// Scoring pipelines and the process-wide model handle
pub mod ml;

// Single and batch prediction services
pub mod prediction;

// Runtime lifecycle
pub mod system;
