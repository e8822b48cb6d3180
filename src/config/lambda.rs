#[cfg(feature = "lambda")]
use crate::core::{ConfigProvider, Storage};
#[cfg(feature = "lambda")]
use crate::utils::error::{ChurnError, Result};
#[cfg(feature = "lambda")]
use aws_sdk_s3::error::ProvideErrorMetadata;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use std::env;

#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct LambdaConfig {
    pub model_bucket: String,
    pub model_key: String,
    pub model_region: String,
    pub decision_threshold: f64,
    pub risk_low: f64,
    pub risk_high: f64,
}

#[cfg(feature = "lambda")]
impl LambdaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            model_bucket: env::var("MODEL_BUCKET").map_err(|_| {
                ChurnError::MissingConfigError {
                    field: "MODEL_BUCKET".to_string(),
                }
            })?,
            model_key: env::var("MODEL_KEY")
                .unwrap_or_else(|_| "models/churn_model.json".to_string()),
            model_region: env::var("MODEL_REGION").unwrap_or_else(|_| "ap-southeast-2".to_string()),
            decision_threshold: env::var("DECISION_THRESHOLD")
                .unwrap_or_else(|_| "0.5".to_string())
                .parse()
                .unwrap_or(super::DEFAULT_DECISION_THRESHOLD),
            risk_low: env::var("RISK_LOW")
                .unwrap_or_else(|_| "0.3".to_string())
                .parse()
                .unwrap_or(super::DEFAULT_RISK_BOUNDARIES.0),
            risk_high: env::var("RISK_HIGH")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse()
                .unwrap_or(super::DEFAULT_RISK_BOUNDARIES.1),
        })
    }
}

#[cfg(feature = "lambda")]
impl ConfigProvider for LambdaConfig {
    fn model_path(&self) -> &str {
        &self.model_key
    }

    fn decision_threshold(&self) -> f64 {
        self.decision_threshold
    }

    fn risk_boundaries(&self) -> (f64, f64) {
        (self.risk_low, self.risk_high)
    }
}

#[cfg(feature = "lambda")]
impl crate::utils::validation::Validate for LambdaConfig {
    fn validate(&self) -> Result<()> {
        use crate::utils::validation::*;

        validate_non_empty_string("MODEL_BUCKET", &self.model_bucket)?;
        validate_path("MODEL_KEY", &self.model_key)?;
        validate_probability("DECISION_THRESHOLD", self.decision_threshold)?;
        validate_risk_boundaries("RISK_LOW/RISK_HIGH", self.risk_low, self.risk_high)?;

        Ok(())
    }
}

/// 從 S3 讀取模型檔（Lambda 冷啟動時呼叫一次）
#[cfg(feature = "lambda")]
#[derive(Debug, Clone)]
pub struct S3Storage {
    client: S3Client,
    bucket: String,
}

#[cfg(feature = "lambda")]
impl S3Storage {
    pub fn new(client: S3Client, bucket: String) -> Self {
        Self { client, bucket }
    }
}

#[cfg(feature = "lambda")]
impl Storage for S3Storage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let object = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(path)
            .send()
            .await
            .map_err(|e| ChurnError::ConfigError {
                message: format!(
                    "Failed to fetch s3://{}/{}: {}",
                    self.bucket,
                    path,
                    e.message().unwrap_or("unknown S3 error")
                ),
            })?;

        let data = object
            .body
            .collect()
            .await
            .map_err(|e| ChurnError::ConfigError {
                message: format!("Failed to read S3 object body: {}", e),
            })?;

        Ok(data.into_bytes().to_vec())
    }
}
