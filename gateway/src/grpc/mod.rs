//! gRPC 客户端

pub mod product {
    tonic::include_proto!("catalog.product.v1");
}

use std::time::Duration;

use async_trait::async_trait;
use catalog_config::ProductServiceConfig;
use product::product_service_client::ProductServiceClient;
use product::{IdRequest, Product};
use tonic::Status;
use tonic::transport::{Channel, Endpoint};
use tracing::debug;

/// 远端商品服务的调用能力
///
/// 生产环境由 [`GrpcProductClient`] 实现，测试中可替换为 mock。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductClient: Send + Sync {
    /// 调用远端 `FindByID`
    async fn find_by_id(&self, request: IdRequest) -> Result<Product, Status>;

    /// 能否与远端建立新连接
    async fn is_ready(&self) -> bool;
}

/// 基于 tonic `Channel` 的商品服务客户端
///
/// `Channel` 延迟连接且可廉价克隆，所有请求共享同一个实例。
#[derive(Clone)]
pub struct GrpcProductClient {
    endpoint: Endpoint,
    client: ProductServiceClient<Channel>,
    deadline: Option<Duration>,
}

impl GrpcProductClient {
    /// 创建延迟连接的客户端，远端不可达时网关仍可启动
    pub fn connect_lazy(config: &ProductServiceConfig) -> Result<Self, tonic::transport::Error> {
        let endpoint = Endpoint::from_shared(config.endpoint.clone())?
            .connect_timeout(config.connect_timeout())
            .tcp_keepalive(Some(Duration::from_secs(30)));
        let channel = endpoint.connect_lazy();

        Ok(Self {
            client: ProductServiceClient::new(channel),
            endpoint,
            deadline: config.deadline(),
        })
    }
}

#[async_trait]
impl ProductClient for GrpcProductClient {
    async fn find_by_id(&self, request: IdRequest) -> Result<Product, Status> {
        let mut client = self.client.clone();
        let call = client.find_by_id(request);

        let response = match self.deadline {
            Some(deadline) => tokio::time::timeout(deadline, call).await.map_err(|_| {
                Status::deadline_exceeded(format!(
                    "no response from product service within {}ms",
                    deadline.as_millis()
                ))
            })??,
            None => call.await?,
        };

        Ok(response.into_inner())
    }

    async fn is_ready(&self) -> bool {
        match self.endpoint.connect().await {
            Ok(_) => true,
            Err(e) => {
                debug!(error = %e, "Product service not reachable");
                false
            }
        }
    }
}
