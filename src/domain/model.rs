use crate::utils::error::{ChurnError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};

/// 一筆電信客戶資料，欄位名稱與訓練資料集一致。
/// 十九個欄位皆為必填，未知欄位一律拒絕。
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerRecord {
    pub gender: String,
    #[serde(rename = "SeniorCitizen")]
    pub senior_citizen: u8,
    #[serde(rename = "Partner")]
    pub partner: String,
    #[serde(rename = "Dependents")]
    pub dependents: String,
    pub tenure: u32,
    #[serde(rename = "PhoneService")]
    pub phone_service: String,
    #[serde(rename = "MultipleLines")]
    pub multiple_lines: String,
    #[serde(rename = "InternetService")]
    pub internet_service: String,
    #[serde(rename = "OnlineSecurity")]
    pub online_security: String,
    #[serde(rename = "OnlineBackup")]
    pub online_backup: String,
    #[serde(rename = "DeviceProtection")]
    pub device_protection: String,
    #[serde(rename = "TechSupport")]
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    #[serde(rename = "StreamingMovies")]
    pub streaming_movies: String,
    #[serde(rename = "Contract")]
    pub contract: String,
    #[serde(rename = "PaperlessBilling")]
    pub paperless_billing: String,
    #[serde(rename = "PaymentMethod")]
    pub payment_method: String,
    #[serde(rename = "MonthlyCharges")]
    pub monthly_charges: f64,
    #[serde(rename = "TotalCharges")]
    pub total_charges: f64,
}

impl CustomerRecord {
    /// 依訓練資料集的欄位名稱取數值特徵
    pub fn numeric_value(&self, field: &str) -> Option<f64> {
        match field {
            "SeniorCitizen" => Some(f64::from(self.senior_citizen)),
            "tenure" => Some(f64::from(self.tenure)),
            "MonthlyCharges" => Some(self.monthly_charges),
            "TotalCharges" => Some(self.total_charges),
            _ => None,
        }
    }

    /// 依訓練資料集的欄位名稱取類別特徵
    pub fn category_value(&self, field: &str) -> Option<&str> {
        match field {
            "gender" => Some(&self.gender),
            "Partner" => Some(&self.partner),
            "Dependents" => Some(&self.dependents),
            "PhoneService" => Some(&self.phone_service),
            "MultipleLines" => Some(&self.multiple_lines),
            "InternetService" => Some(&self.internet_service),
            "OnlineSecurity" => Some(&self.online_security),
            "OnlineBackup" => Some(&self.online_backup),
            "DeviceProtection" => Some(&self.device_protection),
            "TechSupport" => Some(&self.tech_support),
            "StreamingTV" => Some(&self.streaming_tv),
            "StreamingMovies" => Some(&self.streaming_movies),
            "Contract" => Some(&self.contract),
            "PaperlessBilling" => Some(&self.paperless_billing),
            "PaymentMethod" => Some(&self.payment_method),
            _ => None,
        }
    }

    pub fn is_numeric_field(field: &str) -> bool {
        matches!(
            field,
            "SeniorCitizen" | "tenure" | "MonthlyCharges" | "TotalCharges"
        )
    }

    pub fn is_categorical_field(field: &str) -> bool {
        matches!(
            field,
            "gender"
                | "Partner"
                | "Dependents"
                | "PhoneService"
                | "MultipleLines"
                | "InternetService"
                | "OnlineSecurity"
                | "OnlineBackup"
                | "DeviceProtection"
                | "TechSupport"
                | "StreamingTV"
                | "StreamingMovies"
                | "Contract"
                | "PaperlessBilling"
                | "PaymentMethod"
        )
    }
}

impl Validate for CustomerRecord {
    fn validate(&self) -> Result<()> {
        if self.senior_citizen > 1 {
            return Err(ChurnError::InvalidFieldValueError {
                field: "SeniorCitizen".to_string(),
                reason: "must be 0 or 1".to_string(),
            });
        }

        for (field, value) in [
            ("MonthlyCharges", self.monthly_charges),
            ("TotalCharges", self.total_charges),
        ] {
            if !value.is_finite() {
                return Err(ChurnError::InvalidFieldValueError {
                    field: field.to_string(),
                    reason: "must be a finite number".to_string(),
                });
            }
            if value < 0.0 {
                return Err(ChurnError::InvalidFieldValueError {
                    field: field.to_string(),
                    reason: "must be non-negative".to_string(),
                });
            }
        }

        Ok(())
    }
}

/// 流失風險分級，序列化後即為回應中的 "Risk_level" 值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// 依機率分級。分界採下界含入：prob < low 為 Low，
    /// low <= prob < high 為 Moderate，prob >= high 為 High。
    pub fn from_probability(prob: f64, low: f64, high: f64) -> Self {
        if prob < low {
            RiskLevel::Low
        } else if prob < high {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::High => "High",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 單次預測結果，欄位名稱沿用既有的對外格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    #[serde(rename = "Churn")]
    pub churn: bool,
    #[serde(rename = "Churn_probability")]
    pub churn_probability: f64,
    #[serde(rename = "Risk_level")]
    pub risk_level: RiskLevel,
    pub interpretation: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> CustomerRecord {
        serde_json::from_value(serde_json::json!({
            "gender": "Female",
            "SeniorCitizen": 0,
            "Partner": "Yes",
            "Dependents": "No",
            "tenure": 5,
            "PhoneService": "Yes",
            "MultipleLines": "No",
            "InternetService": "Fiber optic",
            "OnlineSecurity": "No",
            "OnlineBackup": "No",
            "DeviceProtection": "No",
            "TechSupport": "No",
            "StreamingTV": "Yes",
            "StreamingMovies": "No",
            "Contract": "Month-to-month",
            "PaperlessBilling": "Yes",
            "PaymentMethod": "Electronic check",
            "MonthlyCharges": 75.3,
            "TotalCharges": 350.5
        }))
        .unwrap()
    }

    #[test]
    fn test_deserialize_full_record() {
        let record = sample_record();
        assert_eq!(record.tenure, 5);
        assert_eq!(record.senior_citizen, 0);
        assert_eq!(record.internet_service, "Fiber optic");
        assert!(record.validate().is_ok());
    }

    #[test]
    fn test_missing_field_is_rejected() {
        let mut value = serde_json::to_value(sample_record()).unwrap();
        value.as_object_mut().unwrap().remove("tenure");
        let result: std::result::Result<CustomerRecord, _> = serde_json::from_value(value);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("tenure"), "error should name the field: {}", err);
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let mut value = serde_json::to_value(sample_record()).unwrap();
        value
            .as_object_mut()
            .unwrap()
            .insert("CustomerId".to_string(), serde_json::json!("C-1"));
        let result: std::result::Result<CustomerRecord, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let mut value = serde_json::to_value(sample_record()).unwrap();
        value
            .as_object_mut()
            .unwrap()
            .insert("tenure".to_string(), serde_json::json!("five"));
        let result: std::result::Result<CustomerRecord, _> = serde_json::from_value(value);
        assert!(result.is_err());
    }

    #[test]
    fn test_senior_citizen_out_of_range() {
        let mut record = sample_record();
        record.senior_citizen = 2;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_negative_charges_rejected() {
        let mut record = sample_record();
        record.monthly_charges = -1.0;
        assert!(record.validate().is_err());
    }

    #[test]
    fn test_field_lookup_split() {
        let record = sample_record();
        assert_eq!(record.numeric_value("tenure"), Some(5.0));
        assert_eq!(record.numeric_value("MonthlyCharges"), Some(75.3));
        assert_eq!(record.category_value("Contract"), Some("Month-to-month"));
        assert_eq!(record.numeric_value("Contract"), None);
        assert_eq!(record.category_value("tenure"), None);
    }

    #[test]
    fn test_risk_level_boundaries_lower_inclusive() {
        assert_eq!(RiskLevel::from_probability(0.0, 0.3, 0.7), RiskLevel::Low);
        assert_eq!(RiskLevel::from_probability(0.29, 0.3, 0.7), RiskLevel::Low);
        assert_eq!(
            RiskLevel::from_probability(0.3, 0.3, 0.7),
            RiskLevel::Moderate
        );
        assert_eq!(
            RiskLevel::from_probability(0.69, 0.3, 0.7),
            RiskLevel::Moderate
        );
        assert_eq!(RiskLevel::from_probability(0.7, 0.3, 0.7), RiskLevel::High);
        assert_eq!(RiskLevel::from_probability(1.0, 0.3, 0.7), RiskLevel::High);
    }

    #[test]
    fn test_risk_level_serializes_capitalized() {
        assert_eq!(
            serde_json::to_value(RiskLevel::Moderate).unwrap(),
            serde_json::json!("Moderate")
        );
    }

    #[test]
    fn test_prediction_result_wire_format() {
        let result = PredictionResult {
            churn: true,
            churn_probability: 0.9021,
            risk_level: RiskLevel::High,
            interpretation: "The customer has a high risk of churning.".to_string(),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["Churn"], serde_json::json!(true));
        assert_eq!(value["Churn_probability"], serde_json::json!(0.9021));
        assert_eq!(value["Risk_level"], serde_json::json!("High"));
        assert!(value["interpretation"].as_str().unwrap().contains("high"));
    }
}
