#[cfg(feature = "lambda")]
use aws_config::BehaviorVersion;
#[cfg(feature = "lambda")]
use aws_sdk_s3::config::Region;
#[cfg(feature = "lambda")]
use aws_sdk_s3::Client as S3Client;
#[cfg(feature = "lambda")]
use churn_api::config::lambda::{LambdaConfig, S3Storage};
#[cfg(feature = "lambda")]
use churn_api::domain::model::PredictionResult;
#[cfg(feature = "lambda")]
use churn_api::domain::ports::PredictService;
#[cfg(feature = "lambda")]
use churn_api::utils::{logger, validation::Validate};
#[cfg(feature = "lambda")]
use churn_api::{ChurnModel, InferencePipeline};
#[cfg(feature = "lambda")]
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
#[cfg(feature = "lambda")]
use serde::Deserialize;
#[cfg(feature = "lambda")]
use std::sync::Arc;

#[cfg(feature = "lambda")]
#[derive(Deserialize)]
pub struct Request {
    pub customer: serde_json::Value,
}

#[cfg(feature = "lambda")]
async fn function_handler(
    pipeline: Arc<dyn PredictService>,
    event: LambdaEvent<Request>,
) -> Result<PredictionResult, Error> {
    tracing::info!("Handling churn prediction event");

    let result = pipeline
        .predict(event.payload.customer)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    tracing::info!(
        "Prediction completed: churn={} risk={}",
        result.churn,
        result.risk_level
    );
    Ok(result)
}

#[cfg(feature = "lambda")]
#[tokio::main]
async fn main() -> Result<(), Error> {
    logger::init_lambda_logger();

    // 冷啟動時讀一次配置和模型，之後每個事件共用
    let lambda_config = LambdaConfig::from_env()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    lambda_config
        .validate()
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let region = Region::new(lambda_config.model_region.clone());
    let config = aws_sdk_s3::config::Builder::from(&config)
        .region(region)
        .force_path_style(true)
        .build();
    let s3_client = S3Client::from_conf(config);

    let storage = S3Storage::new(s3_client, lambda_config.model_bucket.clone());
    let model = ChurnModel::load(&storage, &lambda_config.model_key)
        .await
        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;
    tracing::info!(
        "✅ Model loaded from s3://{}/{}",
        lambda_config.model_bucket,
        lambda_config.model_key
    );

    let pipeline: Arc<dyn PredictService> =
        Arc::new(InferencePipeline::new(model, lambda_config));

    run(service_fn(move |event| {
        let pipeline = pipeline.clone();
        async move { function_handler(pipeline, event).await }
    }))
    .await
}
