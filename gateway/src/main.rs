//! Catalog API Gateway

use std::sync::Arc;

use catalog_config::AppConfig;
use catalog_gateway::grpc::GrpcProductClient;
use catalog_gateway::{AppState, shutdown};
use catalog_telemetry::{init_metrics, init_tracing, init_tracing_json};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // 加载配置
    let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());
    let config = AppConfig::load(&config_dir)?;

    // 初始化 tracing
    if config.telemetry.json {
        init_tracing_json(&config.telemetry.log_level);
    } else {
        init_tracing(&config.telemetry.log_level);
    }

    let metrics = if config.telemetry.metrics {
        let handle = init_metrics()
            .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {e}"))?;
        Some(handle)
    } else {
        None
    };

    // 初始化 gRPC 客户端（延迟连接）
    info!(
        endpoint = %config.product_service.endpoint,
        deadline_ms = ?config.product_service.deadline_ms,
        "Connecting to product service"
    );
    let client = GrpcProductClient::connect_lazy(&config.product_service)?;

    let app = catalog_gateway::app(AppState::new(Arc::new(client), metrics));

    // 启动服务器
    let listener = catalog_gateway::bind(&config.server).await?;
    let addr = listener.local_addr()?;

    info!(%addr, env = %config.app_env, "Starting gateway");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown::shutdown_signal())
        .await?;

    info!("Gateway stopped");
    Ok(())
}
