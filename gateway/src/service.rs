//! 商品查询服务
//!
//! 入站标识 -> `IdRequest`，远端 `Product` -> [`ProductResponse`]，不做任何校验或转换。

use std::sync::Arc;
use std::time::Instant;

use catalog_errors::LookupError;
use catalog_telemetry::{PRODUCT_LOOKUP_DURATION_SECONDS, PRODUCT_LOOKUPS_TOTAL};
use metrics::{counter, histogram};
use tonic::Status;
use tracing::debug;

use crate::grpc::ProductClient;
use crate::grpc::product::IdRequest;
use crate::product::ProductResponse;

pub struct ProductService {
    client: Arc<dyn ProductClient>,
}

impl ProductService {
    pub fn new(client: Arc<dyn ProductClient>) -> Self {
        Self { client }
    }

    /// 查询单个商品
    ///
    /// 远端错误原样归类为 [`LookupError`]，不重试、不兜底。
    pub async fn get_product(&self, product_id: &str) -> Result<ProductResponse, LookupError> {
        debug!(product_id, "ProductService.get_product");

        let request = IdRequest {
            id: product_id.to_string(),
        };

        let started = Instant::now();
        // JSON 无法表示 NaN/Infinity，按远端错误处理
        let result = self.client.find_by_id(request).await.and_then(|product| {
            if product.price.is_finite() {
                Ok(product)
            } else {
                Err(Status::internal(format!(
                    "product {} has non-finite price {}",
                    product.id, product.price
                )))
            }
        });
        histogram!(PRODUCT_LOOKUP_DURATION_SECONDS).record(started.elapsed().as_secs_f64());

        match result {
            Ok(product) => {
                counter!(PRODUCT_LOOKUPS_TOTAL, "outcome" => "ok").increment(1);
                Ok(ProductResponse::from(product))
            }
            Err(status) => {
                let err = LookupError::from_status(product_id, status);
                counter!(PRODUCT_LOOKUPS_TOTAL, "outcome" => err.outcome()).increment(1);
                Err(err)
            }
        }
    }

    pub async fn is_ready(&self) -> bool {
        self.client.is_ready().await
    }
}
