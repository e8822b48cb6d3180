use churn_api::config::toml_config::TomlConfig;
use churn_api::core::ConfigProvider;
use churn_api::server::{self, AppState};
use churn_api::utils::monitor::SystemMonitor;
use churn_api::utils::{logger, validation::Validate};
use churn_api::{ChurnModel, CliConfig, InferencePipeline, LocalStorage};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting churn-api service");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let monitor_enabled = cli.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    // --config 指定 TOML 時以檔案配置為準，否則用 CLI 參數
    let result = match cli.config.clone() {
        Some(path) => match TomlConfig::from_file(&path) {
            Ok(toml_config) => {
                let host = toml_config.host().to_string();
                let port = toml_config.port();
                let monitor = monitor_enabled || toml_config.monitoring_enabled();
                run_server(host, port, toml_config, monitor).await
            }
            Err(e) => Err(e),
        },
        None => {
            let host = cli.host.clone();
            let port = cli.port;
            run_server(host, port, cli, monitor_enabled).await
        }
    };

    if let Err(e) = result {
        // 記錄詳細錯誤信息
        tracing::error!(
            "❌ Service failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        // 輸出用戶友好的錯誤信息
        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

        // 根據錯誤嚴重程度決定退出碼
        let exit_code = match e.severity() {
            churn_api::utils::error::ErrorSeverity::Low => 0,
            churn_api::utils::error::ErrorSeverity::Medium => 2,
            churn_api::utils::error::ErrorSeverity::High => 1,
            churn_api::utils::error::ErrorSeverity::Critical => 3,
        };

        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    Ok(())
}

async fn run_server<C>(
    host: String,
    port: u16,
    config: C,
    monitor_enabled: bool,
) -> churn_api::Result<()>
where
    C: ConfigProvider + Validate + 'static,
{
    // 驗證配置
    config.validate()?;

    let monitor = Arc::new(SystemMonitor::new(monitor_enabled));
    monitor.log_stats("Startup");

    // 模型只在啟動時載入一次；失敗即中止，不開始接收流量
    let model_path = config.model_path().to_string();
    tracing::info!("Loading model artifact from {}", model_path);
    let storage = LocalStorage::new(".".to_string());
    let model = ChurnModel::load(&storage, &model_path).await?;
    tracing::info!(
        "✅ Model loaded successfully ({} features)",
        model.feature_count()
    );

    let pipeline = InferencePipeline::new(model, config);
    let state = AppState::new(Arc::new(pipeline), model_path);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("🚀 Serving on http://{}", addr);
    println!("🚀 churn-api listening on http://{}", addr);

    monitor.spawn_periodic(Duration::from_secs(60));

    server::serve(listener, state).await
}
