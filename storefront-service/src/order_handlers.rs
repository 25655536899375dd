use axum::{
    extract::{Path, State},
    Json,
};
use bigdecimal::BigDecimal;
use chrono::Utc;
use common_http_errors::{ApiError, ApiResult};
use common_money::{nearly_equal, normalize_scale};
use serde::Deserialize;
use sqlx::types::Json as Jsonb;
use uuid::Uuid;

use crate::app::AppState;
use crate::sessions::CurrentUser;
use crate::store::{Order, OrderItem, OrderStatus};

// Allowed drift between the submitted total and the catalog sum, in cents.
const TOTAL_TOLERANCE_CENTS: i64 = 1;

#[derive(Deserialize)]
pub struct NewOrder {
    #[serde(alias = "products")]
    pub items: Vec<OrderItem>,
    pub total: BigDecimal,
}

pub async fn create_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(new_order): Json<NewOrder>,
) -> ApiResult<Json<Order>> {
    let NewOrder { items, total } = new_order;

    if items.is_empty() {
        return Err(ApiError::bad_request("empty_order", "Order has no line items"));
    }

    let mut expected = BigDecimal::from(0);
    for item in &items {
        if item.quantity <= 0 {
            return Err(ApiError::bad_request("invalid_quantity", "Line item quantity must be positive"));
        }
        let product = state
            .products
            .find(item.product_id)
            .await
            .map_err(ApiError::internal)?
            .ok_or_else(|| {
                ApiError::bad_request("unknown_product", "Order references an unknown product")
            })?;
        expected += product.price * BigDecimal::from(item.quantity);
    }

    if !nearly_equal(&expected, &total, TOTAL_TOLERANCE_CENTS) {
        return Err(ApiError::bad_request(
            "total_mismatch",
            "Order total does not match catalog prices",
        ));
    }

    let order = Order {
        id: Uuid::new_v4(),
        user_id: user.id,
        items: Jsonb(items),
        total: normalize_scale(&total),
        status: OrderStatus::Created.as_str().to_string(),
        transaction_id: None,
        created_at: Utc::now(),
    };

    state.orders.insert(&order).await.map_err(|err| {
        tracing::warn!(error = %err, "Failed to create order");
        ApiError::bad_request("order_create_failed", "Error creating order")
    })?;

    Ok(Json(order))
}

pub async fn list_orders(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<Order>>> {
    let orders = state
        .orders
        .list_for_user(user.id)
        .await
        .map_err(ApiError::internal)?;
    Ok(Json(orders))
}

pub async fn get_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
) -> ApiResult<Json<Order>> {
    let order = state
        .orders
        .find(order_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or(ApiError::NotFound { code: "order_not_found", message: "Order not found" })?;

    if order.user_id != user.id {
        return Err(ApiError::Forbidden { message: "You do not have access to this order" });
    }

    Ok(Json(order))
}
