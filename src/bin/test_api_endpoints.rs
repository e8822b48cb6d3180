use anyhow::Context;
use std::time::Duration;

fn sample_clients() -> Vec<serde_json::Value> {
    vec![
        serde_json::json!({
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
        }),
        serde_json::json!({
            "gender": "Male",
            "SeniorCitizen": 1,
            "Partner": "No",
            "Dependents": "No",
            "tenure": 40,
            "PhoneService": "Yes",
            "MultipleLines": "Yes",
            "InternetService": "DSL",
            "OnlineSecurity": "Yes",
            "OnlineBackup": "Yes",
            "DeviceProtection": "Yes",
            "TechSupport": "Yes",
            "StreamingTV": "Yes",
            "StreamingMovies": "Yes",
            "Contract": "Two year",
            "PaperlessBilling": "No",
            "PaymentMethod": "Credit card (automatic)",
            "MonthlyCharges": 65.7,
            "TotalCharges": 2600.4
        }),
    ]
}

async fn wait_for_health(client: &reqwest::Client, base_url: &str) -> bool {
    for attempt in 1..=5 {
        match client
            .get(format!("{}/health", base_url))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(resp) if resp.status().is_success() => {
                println!("✅ API 已就緒 (attempt {})", attempt);
                return true;
            }
            _ => {
                println!("⌛ 等待 API 啟動...");
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    }
    false
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let base_url =
        std::env::var("CHURN_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".to_string());

    println!("🧪 測試 churn-api 端點: {}", base_url);

    let client = reqwest::Client::new();

    if !wait_for_health(&client, &base_url).await {
        eprintln!("❌ 無法連線到 API，請先啟動服務: cargo run -- --port 8000");
        std::process::exit(1);
    }

    // 服務資訊
    let resp = client
        .get(format!("{}/", base_url))
        .send()
        .await
        .context("GET / failed")?;
    println!("→ GET / 狀態碼: {}", resp.status());
    let info: serde_json::Value = resp.json().await.context("GET / returned invalid JSON")?;
    println!("  {}", serde_json::to_string_pretty(&info)?);

    // 逐筆送出範例客戶
    for (i, customer) in sample_clients().into_iter().enumerate() {
        println!("→ 客戶 {} 預測中...", i + 1);
        match client
            .post(format!("{}/predict", base_url))
            .json(&customer)
            .timeout(Duration::from_secs(10))
            .send()
            .await
        {
            Ok(resp) => {
                println!("  狀態碼: {}", resp.status());
                match resp.json::<serde_json::Value>().await {
                    Ok(body) => println!(
                        "  {}",
                        serde_json::to_string_pretty(&body).unwrap_or_default()
                    ),
                    Err(e) => eprintln!("  ❌ 回應解析失敗: {}", e),
                }
            }
            Err(e) => eprintln!("  ❌ 預測請求失敗: {}", e),
        }
        println!("{}", "-".repeat(60));
    }

    println!("🎯 測試完成");
    Ok(())
}
