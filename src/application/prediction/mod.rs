pub mod batch;
pub mod model_info;
pub mod single;

pub use batch::{BatchPredictionService, MAX_BATCH_SIZE};
pub use model_info::{HealthStatus, ModelInfo, ServiceStatus};
pub use single::SinglePredictionService;
