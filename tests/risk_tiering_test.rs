use churn_api::core::pipeline::round_probability;
use churn_api::core::{ConfigProvider, CustomerRecord, RiskLevel, Scorer};
use churn_api::domain::ports::PredictService;
use churn_api::InferencePipeline;
use churn_api::Result;

/// 固定機率的打樁計分器
struct StubScorer(f64);

impl Scorer for StubScorer {
    fn score_probability(&self, _record: &CustomerRecord) -> Result<f64> {
        Ok(self.0)
    }
}

struct DefaultConfig;

impl ConfigProvider for DefaultConfig {
    fn model_path(&self) -> &str {
        "models/churn_model.json"
    }

    fn decision_threshold(&self) -> f64 {
        0.5
    }

    fn risk_boundaries(&self) -> (f64, f64) {
        (0.3, 0.7)
    }
}

fn valid_payload() -> serde_json::Value {
    serde_json::json!({
        "gender": "Male",
        "SeniorCitizen": 0,
        "Partner": "No",
        "Dependents": "No",
        "tenure": 12,
        "PhoneService": "Yes",
        "MultipleLines": "No",
        "InternetService": "DSL",
        "OnlineSecurity": "Yes",
        "OnlineBackup": "No",
        "DeviceProtection": "No",
        "TechSupport": "No",
        "StreamingTV": "No",
        "StreamingMovies": "No",
        "Contract": "One year",
        "PaperlessBilling": "No",
        "PaymentMethod": "Mailed check",
        "MonthlyCharges": 45.0,
        "TotalCharges": 540.0
    })
}

async fn predict_at(prob: f64) -> churn_api::domain::model::PredictionResult {
    let pipeline = InferencePipeline::new(StubScorer(prob), DefaultConfig);
    pipeline.predict(valid_payload()).await.unwrap()
}

#[tokio::test]
async fn test_every_probability_maps_to_exactly_one_tier() {
    // 掃過 [0,1]，每個機率都要有唯一分級
    let mut prob = 0.0;
    while prob <= 1.0 {
        let result = predict_at(prob).await;
        let expected = if prob < 0.3 {
            RiskLevel::Low
        } else if prob < 0.7 {
            RiskLevel::Moderate
        } else {
            RiskLevel::High
        };
        assert_eq!(result.risk_level, expected, "prob {}", prob);
        prob += 0.01;
    }
}

#[tokio::test]
async fn test_boundaries_belong_to_upper_tier() {
    assert_eq!(predict_at(0.3).await.risk_level, RiskLevel::Moderate);
    assert_eq!(predict_at(0.7).await.risk_level, RiskLevel::High);
}

#[tokio::test]
async fn test_churn_flag_flips_exactly_at_threshold() {
    assert!(!predict_at(0.4999999).await.churn);
    assert!(predict_at(0.5).await.churn);
    assert!(predict_at(0.5000001).await.churn);
}

#[tokio::test]
async fn test_interpretation_names_tier_in_lowercase() {
    let result = predict_at(0.1).await;
    assert_eq!(
        result.interpretation,
        "The customer has a low risk of churning."
    );

    let result = predict_at(0.5).await;
    assert_eq!(
        result.interpretation,
        "The customer has a moderate risk of churning."
    );

    let result = predict_at(0.95).await;
    assert_eq!(
        result.interpretation,
        "The customer has a high risk of churning."
    );
}

#[tokio::test]
async fn test_reported_probability_is_rounded_to_four_decimals() {
    let result = predict_at(0.123456789).await;
    assert_eq!(result.churn_probability, 0.1235);

    // 已四捨五入的值再丟一次不會改變
    assert_eq!(
        round_probability(result.churn_probability),
        result.churn_probability
    );
}

#[tokio::test]
async fn test_custom_boundaries_are_honored() {
    struct WideConfig;

    impl ConfigProvider for WideConfig {
        fn model_path(&self) -> &str {
            "models/churn_model.json"
        }

        fn decision_threshold(&self) -> f64 {
            0.5
        }

        fn risk_boundaries(&self) -> (f64, f64) {
            (0.1, 0.9)
        }
    }

    let pipeline = InferencePipeline::new(StubScorer(0.5), WideConfig);
    let result = pipeline.predict(valid_payload()).await.unwrap();
    assert_eq!(result.risk_level, RiskLevel::Moderate);

    let pipeline = InferencePipeline::new(StubScorer(0.95), WideConfig);
    let result = pipeline.predict(valid_payload()).await.unwrap();
    assert_eq!(result.risk_level, RiskLevel::High);
}
