pub mod logistic_pipeline;
pub mod model_adapter;
pub mod pipeline;
