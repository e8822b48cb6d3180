use crate::domain::ports::PredictService;
use crate::utils::error::{ChurnError, Result};
use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use std::sync::Arc;

pub const SERVICE_NAME: &str = "Telco customer churn prediction API";

/// 路由共享狀態。管線（含已載入的模型）在啟動時建好，
/// 之後唯讀共享，所以並發請求不需要任何鎖。
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<dyn PredictService>,
    pub model_path: String,
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(pipeline: Arc<dyn PredictService>, model_path: String) -> Self {
        Self {
            pipeline,
            model_path,
            started_at: chrono::Utc::now(),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/health", get(health))
        .route("/predict", post(predict))
        .with_state(state)
}

/// 綁定完成的 listener 開始服務；/health 只有在模型載入成功、
/// 狀態建好之後才可能回應
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> Result<()> {
    axum::serve(listener, build_router(state)).await?;
    Ok(())
}

async fn home(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "message": SERVICE_NAME,
        "status": "online",
        "model_path": state.model_path,
        "version": env!("CARGO_PKG_VERSION"),
        "started_at": state.started_at.to_rfc3339(),
    }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "model_loaded": true,
    }))
}

async fn predict(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> std::result::Result<Json<crate::domain::model::PredictionResult>, (StatusCode, Json<serde_json::Value>)>
{
    match state.pipeline.predict(payload).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            if e.is_client_error() {
                tracing::warn!("Rejected prediction request: {}", e);
            } else {
                tracing::error!("Prediction request failed: {}", e);
            }
            Err(error_response(&e))
        }
    }
}

/// 輸入錯誤回 422，其餘一律 500；訊息不帶內部細節
fn error_response(err: &ChurnError) -> (StatusCode, Json<serde_json::Value>) {
    let status = if err.is_client_error() {
        StatusCode::UNPROCESSABLE_ENTITY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };

    (
        status,
        Json(serde_json::json!({ "error": err.user_friendly_message() })),
    )
}
