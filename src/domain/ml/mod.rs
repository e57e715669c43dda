pub mod confidence;
pub mod feature_schema;
pub mod feature_vector;
pub mod prediction;
