use axum::{
    extract::{Path, State},
    Json,
};
use bigdecimal::BigDecimal;
use common_http_errors::{ApiError, ApiResult};
use common_money::normalize_scale;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::app::AppState;
use crate::store::Product;

#[derive(Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub price: BigDecimal,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub message: &'static str,
}

pub async fn list_products(State(state): State<AppState>) -> ApiResult<Json<Vec<Product>>> {
    let products = state.products.list().await.map_err(ApiError::internal)?;
    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<AppState>,
    Json(new_product): Json<NewProduct>,
) -> ApiResult<Json<Product>> {
    let NewProduct { name, price, description, active } = new_product;
    let product = Product {
        id: Uuid::new_v4(),
        name,
        price: normalize_scale(&price),
        description,
        active,
    };
    state
        .products
        .insert(&product)
        .await
        .map_err(|_| ApiError::bad_request("product_create_failed", "Error creating product"))?;
    Ok(Json(product))
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(upd): Json<NewProduct>,
) -> ApiResult<Json<Product>> {
    let NewProduct { name, price, description, active } = upd;
    let product = Product {
        id: product_id,
        name,
        price: normalize_scale(&price),
        description,
        active,
    };
    let found = state.products.update(&product).await.map_err(ApiError::internal)?;
    if !found {
        return Err(ApiError::NotFound { code: "product_not_found", message: "Product not found" });
    }
    Ok(Json(product))
}

pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> ApiResult<Json<DeleteResponse>> {
    let found = state.products.delete(product_id).await.map_err(ApiError::internal)?;
    if !found {
        return Err(ApiError::NotFound { code: "product_not_found", message: "Product not found" });
    }
    Ok(Json(DeleteResponse { message: "Product deleted successfully" }))
}
