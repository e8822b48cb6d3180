use crate::domain::model::CustomerRecord;
use crate::domain::ports::{Scorer, Storage};
use crate::utils::error::{ChurnError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 訓練管線匯出的邏輯迴歸模型檔（JSON）。
/// 數值特徵以 (x - mean) / std 標準化後乘上係數，
/// 類別特徵取對應類別的係數，再加上截距後過 sigmoid。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model_type: String,
    pub trained_at: Option<String>,
    pub intercept: f64,
    pub numeric_features: Vec<NumericFeature>,
    pub categorical_features: Vec<CategoricalFeature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NumericFeature {
    pub name: String,
    pub mean: f64,
    pub std: f64,
    pub coef: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoricalFeature {
    pub name: String,
    pub coefficients: HashMap<String, f64>,
}

const SUPPORTED_MODEL_TYPE: &str = "logistic_regression";

/// 載入後唯讀的流失分類器。純函數計分，可跨請求共享。
#[derive(Debug)]
pub struct ChurnModel {
    artifact: ModelArtifact,
}

impl ChurnModel {
    /// 透過 Storage 讀取並解析模型檔。程序啟動時呼叫一次；
    /// 任何失敗都是 ModelLoadError，服務不得開始接收流量。
    pub async fn load<S: Storage>(storage: &S, path: &str) -> Result<Self> {
        let bytes = storage
            .read_file(path)
            .await
            .map_err(|e| ChurnError::ModelLoadError {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        Self::from_bytes(path, &bytes)
    }

    pub fn from_bytes(path: &str, bytes: &[u8]) -> Result<Self> {
        let artifact: ModelArtifact =
            serde_json::from_slice(bytes).map_err(|e| ChurnError::ModelLoadError {
                path: path.to_string(),
                reason: format!("artifact is not valid model JSON: {}", e),
            })?;

        Self::validate_artifact(&artifact).map_err(|reason| ChurnError::ModelLoadError {
            path: path.to_string(),
            reason,
        })?;

        Ok(Self { artifact })
    }

    pub fn feature_count(&self) -> usize {
        self.artifact.numeric_features.len() + self.artifact.categorical_features.len()
    }

    /// 啟動時就把模型檔和客戶資料欄位對齊，
    /// 之後計分對任何通過驗證的輸入都不會失敗
    fn validate_artifact(artifact: &ModelArtifact) -> std::result::Result<(), String> {
        if artifact.model_type != SUPPORTED_MODEL_TYPE {
            return Err(format!(
                "unsupported model_type '{}', expected '{}'",
                artifact.model_type, SUPPORTED_MODEL_TYPE
            ));
        }

        if !artifact.intercept.is_finite() {
            return Err("intercept is not finite".to_string());
        }

        if artifact.numeric_features.is_empty() && artifact.categorical_features.is_empty() {
            return Err("artifact contains no features".to_string());
        }

        for feature in &artifact.numeric_features {
            if !CustomerRecord::is_numeric_field(&feature.name) {
                return Err(format!(
                    "unknown numeric feature '{}' in artifact",
                    feature.name
                ));
            }
            if !feature.mean.is_finite() || !feature.std.is_finite() || !feature.coef.is_finite() {
                return Err(format!("non-finite parameters for feature '{}'", feature.name));
            }
            if feature.std <= 0.0 {
                return Err(format!(
                    "feature '{}' has non-positive std {}",
                    feature.name, feature.std
                ));
            }
        }

        for feature in &artifact.categorical_features {
            if !CustomerRecord::is_categorical_field(&feature.name) {
                return Err(format!(
                    "unknown categorical feature '{}' in artifact",
                    feature.name
                ));
            }
            if feature.coefficients.is_empty() {
                return Err(format!("feature '{}' has no categories", feature.name));
            }
            for (category, coef) in &feature.coefficients {
                if !coef.is_finite() {
                    return Err(format!(
                        "non-finite coefficient for '{}' = '{}'",
                        feature.name, category
                    ));
                }
            }
        }

        Ok(())
    }

    fn linear_term(&self, record: &CustomerRecord) -> f64 {
        let mut z = self.artifact.intercept;

        for feature in &self.artifact.numeric_features {
            // 載入時已驗證過名稱，這裡不會是 None
            if let Some(value) = record.numeric_value(&feature.name) {
                z += feature.coef * (value - feature.mean) / feature.std;
            }
        }

        for feature in &self.artifact.categorical_features {
            if let Some(value) = record.category_value(&feature.name) {
                // 訓練時沒見過的類別視為零貢獻
                z += feature.coefficients.get(value).copied().unwrap_or(0.0);
            }
        }

        z
    }
}

impl Scorer for ChurnModel {
    fn score_probability(&self, record: &CustomerRecord) -> Result<f64> {
        let z = self.linear_term(record);
        let prob = sigmoid(z);

        if !prob.is_finite() || !(0.0..=1.0).contains(&prob) {
            return Err(ChurnError::InferenceError {
                message: format!("model produced an invalid probability from z={}", z),
            });
        }

        Ok(prob)
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_artifact_json() -> String {
        serde_json::json!({
            "model_type": "logistic_regression",
            "trained_at": "2025-11-02T09:30:00Z",
            "intercept": -1.0,
            "numeric_features": [
                {"name": "tenure", "mean": 30.0, "std": 20.0, "coef": -1.0}
            ],
            "categorical_features": [
                {"name": "Contract", "coefficients": {
                    "Month-to-month": 1.0,
                    "One year": 0.0,
                    "Two year": -1.0
                }}
            ]
        })
        .to_string()
    }

    fn record_with(tenure: u32, contract: &str) -> CustomerRecord {
        serde_json::from_value(serde_json::json!({
            "gender": "Female",
            "SeniorCitizen": 0,
            "Partner": "Yes",
            "Dependents": "No",
            "tenure": tenure,
            "PhoneService": "Yes",
            "MultipleLines": "No",
            "InternetService": "DSL",
            "OnlineSecurity": "No",
            "OnlineBackup": "No",
            "DeviceProtection": "No",
            "TechSupport": "No",
            "StreamingTV": "No",
            "StreamingMovies": "No",
            "Contract": contract,
            "PaperlessBilling": "Yes",
            "PaymentMethod": "Electronic check",
            "MonthlyCharges": 50.0,
            "TotalCharges": 500.0
        }))
        .unwrap()
    }

    #[test]
    fn test_parse_and_score() {
        let model = ChurnModel::from_bytes("mem", tiny_artifact_json().as_bytes()).unwrap();
        assert_eq!(model.feature_count(), 2);

        // tenure=30 抵銷標準化項：z = -1.0 + 1.0 = 0 → 0.5
        let prob = model
            .score_probability(&record_with(30, "Month-to-month"))
            .unwrap();
        assert!((prob - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_longer_tenure_lowers_probability() {
        let model = ChurnModel::from_bytes("mem", tiny_artifact_json().as_bytes()).unwrap();
        let short = model
            .score_probability(&record_with(2, "Month-to-month"))
            .unwrap();
        let long = model
            .score_probability(&record_with(60, "Month-to-month"))
            .unwrap();
        assert!(short > long);
    }

    #[test]
    fn test_contract_coefficients_ordered() {
        let model = ChurnModel::from_bytes("mem", tiny_artifact_json().as_bytes()).unwrap();
        let mtm = model
            .score_probability(&record_with(30, "Month-to-month"))
            .unwrap();
        let two_year = model.score_probability(&record_with(30, "Two year")).unwrap();
        assert!(mtm > two_year);
    }

    #[test]
    fn test_unknown_category_contributes_zero() {
        let model = ChurnModel::from_bytes("mem", tiny_artifact_json().as_bytes()).unwrap();
        let known = model.score_probability(&record_with(30, "One year")).unwrap();
        let unknown = model
            .score_probability(&record_with(30, "Half year"))
            .unwrap();
        // "One year" 係數為 0，未知類別也應得到相同結果
        assert!((known - unknown).abs() < 1e-12);
    }

    #[test]
    fn test_probability_always_in_unit_interval() {
        let model = ChurnModel::from_bytes("mem", tiny_artifact_json().as_bytes()).unwrap();
        for tenure in [0, 1, 12, 48, 72, 500] {
            let prob = model
                .score_probability(&record_with(tenure, "Month-to-month"))
                .unwrap();
            assert!((0.0..=1.0).contains(&prob), "prob {} out of range", prob);
        }
    }

    #[test]
    fn test_invalid_json_is_load_error() {
        let err = ChurnModel::from_bytes("mem", b"not json").unwrap_err();
        assert!(matches!(err, ChurnError::ModelLoadError { .. }));
    }

    #[test]
    fn test_unknown_feature_name_is_load_error() {
        let artifact = serde_json::json!({
            "model_type": "logistic_regression",
            "trained_at": null,
            "intercept": 0.0,
            "numeric_features": [
                {"name": "CreditScore", "mean": 0.0, "std": 1.0, "coef": 1.0}
            ],
            "categorical_features": []
        })
        .to_string();
        let err = ChurnModel::from_bytes("mem", artifact.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("CreditScore"));
    }

    #[test]
    fn test_non_positive_std_is_load_error() {
        let artifact = serde_json::json!({
            "model_type": "logistic_regression",
            "trained_at": null,
            "intercept": 0.0,
            "numeric_features": [
                {"name": "tenure", "mean": 30.0, "std": 0.0, "coef": 1.0}
            ],
            "categorical_features": []
        })
        .to_string();
        assert!(ChurnModel::from_bytes("mem", artifact.as_bytes()).is_err());
    }

    #[test]
    fn test_unsupported_model_type_is_load_error() {
        let artifact = serde_json::json!({
            "model_type": "random_forest",
            "trained_at": null,
            "intercept": 0.0,
            "numeric_features": [],
            "categorical_features": []
        })
        .to_string();
        let err = ChurnModel::from_bytes("mem", artifact.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("random_forest"));
    }

    #[test]
    fn test_sigmoid_extremes() {
        assert!(sigmoid(-800.0) >= 0.0);
        assert!(sigmoid(800.0) <= 1.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
