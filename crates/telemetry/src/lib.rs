//! telemetry - 可观测性库

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// 商品查询次数（按结果分类）
pub const PRODUCT_LOOKUPS_TOTAL: &str = "product_lookups_total";
/// 商品查询耗时
pub const PRODUCT_LOOKUP_DURATION_SECONDS: &str = "product_lookup_duration_seconds";

/// 初始化 tracing
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// 初始化 JSON 格式的 tracing（生产环境）
pub fn init_tracing_json(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().json())
        .init();
}

/// 初始化 Prometheus metrics
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    describe_metrics();
    Ok(handle)
}

fn describe_metrics() {
    describe_counter!(
        PRODUCT_LOOKUPS_TOTAL,
        "Product lookups forwarded to the product gRPC service, labelled by outcome"
    );
    describe_histogram!(
        PRODUCT_LOOKUP_DURATION_SECONDS,
        metrics::Unit::Seconds,
        "Round-trip latency of product lookups"
    );
}
