//! 商品路由

use axum::{
    Json, Router,
    extract::{Path, State, rejection::PathRejection},
    routing::get,
};
use catalog_errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::AppState;
use crate::grpc::product::Product;

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(missing_product_id))
        .route("/products/", get(missing_product_id))
        .route("/products/{product_id}", get(get_product))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub price: f64,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            name: product.name,
            price: product.price,
        }
    }
}

/// 根据 ID 查询商品
async fn get_product(
    State(state): State<AppState>,
    path: Result<Path<String>, PathRejection>,
) -> AppResult<Json<ProductResponse>> {
    let Path(product_id) =
        path.map_err(|rejection| AppError::invalid_parameter("productId", rejection.body_text()))?;

    info!(%product_id, "ProductController.get_product");

    let product = state.products.get_product(&product_id).await?;
    Ok(Json(product))
}

async fn missing_product_id() -> AppError {
    AppError::missing_parameter("productId")
}
