use crate::core::{ConfigProvider, CustomerRecord, PredictionResult, RiskLevel, Scorer};
use crate::utils::error::{ChurnError, Result};
use crate::utils::validation::Validate;
use async_trait::async_trait;

/// 請求層級的推論管線：驗證 → 計分 → 判定 → 分級 → 組裝回應。
/// 除回傳值外沒有任何副作用。
pub struct InferencePipeline<S: Scorer, C: ConfigProvider> {
    scorer: S,
    config: C,
}

impl<S: Scorer, C: ConfigProvider> InferencePipeline<S, C> {
    pub fn new(scorer: S, config: C) -> Self {
        Self { scorer, config }
    }

    /// 解析並驗證原始 JSON。缺欄位、型別錯誤、多餘欄位
    /// 都在這裡擋下，不會碰到模型。
    fn coerce(&self, raw: serde_json::Value) -> Result<CustomerRecord> {
        let record: CustomerRecord =
            serde_json::from_value(raw).map_err(|e| ChurnError::MalformedInputError {
                message: e.to_string(),
            })?;
        record.validate()?;
        Ok(record)
    }
}

#[async_trait]
impl<S: Scorer, C: ConfigProvider> crate::domain::ports::PredictService
    for InferencePipeline<S, C>
{
    async fn predict(&self, raw: serde_json::Value) -> Result<PredictionResult> {
        let record = self.coerce(raw)?;

        let prob = self.scorer.score_probability(&record)?;
        tracing::debug!("Raw churn probability: {}", prob);

        // 判定與分級都用原始機率，四捨五入只影響顯示
        let churn = prob >= self.config.decision_threshold();
        let (low, high) = self.config.risk_boundaries();
        let risk_level = RiskLevel::from_probability(prob, low, high);

        Ok(PredictionResult {
            churn,
            churn_probability: round_probability(prob),
            risk_level,
            interpretation: format!(
                "The customer has a {} risk of churning.",
                risk_level.as_str().to_lowercase()
            ),
        })
    }
}

/// 機率取四位小數。f64::round 為 round-half-away-from-zero，
/// 對非負的機率等同 round-half-up。
pub fn round_probability(prob: f64) -> f64 {
    (prob * 10_000.0).round() / 10_000.0
}
