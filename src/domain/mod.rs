// Feature schema, confidence policy and prediction results
pub mod ml;

// Raw input records and their validation
pub mod validation;

// Domain-specific error types
pub mod errors;
