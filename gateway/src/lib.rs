//! Catalog API Gateway
//!
//! `GET /products/{productId}` 转发到远端商品 gRPC 服务并映射为 REST 响应。

pub mod grpc;
pub mod product;
pub mod routing;
pub mod service;
pub mod shutdown;

use std::sync::Arc;

use axum::Router;
use catalog_config::ServerConfig;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::CorsLayer;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::grpc::ProductClient;
use crate::service::ProductService;

/// 路由共享状态
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService>,
    pub metrics: Option<PrometheusHandle>,
}

impl AppState {
    pub fn new(client: Arc<dyn ProductClient>, metrics: Option<PrometheusHandle>) -> Self {
        Self {
            products: Arc::new(ProductService::new(client)),
            metrics,
        }
    }
}

/// 构建完整路由
pub fn app(state: AppState) -> Router {
    product::product_routes()
        .merge(routing::api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// 绑定监听地址，`host` 可以是 IP、主机名或不带方括号的 IPv6 地址
pub async fn bind(server: &ServerConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind((server.host.as_str(), server.port)).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_accepts_hostname_and_ipv4() {
        for host in ["localhost", "127.0.0.1"] {
            let server = ServerConfig {
                host: host.to_string(),
                port: 0,
            };

            let listener = bind(&server).await.unwrap();
            assert!(listener.local_addr().unwrap().ip().is_loopback());
        }
    }

    #[tokio::test]
    async fn test_bind_rejects_unknown_host() {
        let server = ServerConfig {
            host: "no such host".to_string(),
            port: 0,
        };

        assert!(bind(&server).await.is_err());
    }
}
