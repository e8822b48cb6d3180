use crate::domain::model::{CustomerRecord, PredictionResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model_path(&self) -> &str;
    fn decision_threshold(&self) -> f64;
    fn risk_boundaries(&self) -> (f64, f64);
}

/// 已載入的分類器：輸入一筆驗證過的客戶資料，輸出正類(流失)機率
pub trait Scorer: Send + Sync {
    fn score_probability(&self, record: &CustomerRecord) -> Result<f64>;
}

#[async_trait]
pub trait PredictService: Send + Sync {
    async fn predict(&self, raw: serde_json::Value) -> Result<PredictionResult>;
}
