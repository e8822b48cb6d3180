pub mod classifier;
pub mod pipeline;

pub use crate::domain::model::{CustomerRecord, PredictionResult, RiskLevel};
pub use crate::domain::ports::{ConfigProvider, PredictService, Scorer, Storage};
pub use crate::utils::error::Result;
