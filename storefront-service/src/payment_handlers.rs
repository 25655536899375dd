use axum::{
    extract::{Path, State},
    Json,
};
use common_http_errors::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use uuid::Uuid;

use crate::app::AppState;
use crate::sessions::CurrentUser;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayOrder {
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub payment_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayAck {
    pub message: &'static str,
    pub phone_pe_transaction_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusAck {
    pub message: &'static str,
    pub status: String,
    pub transaction_id: String,
}

pub async fn pay_order(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(order_id): Path<Uuid>,
    Json(req): Json<PayOrder>,
) -> ApiResult<Json<PayAck>> {
    let order = state
        .orders
        .find(order_id)
        .await
        .map_err(|err| {
            error!(error = %err, order_id = %order_id, "Failed to load order");
            ApiError::bad_request("payment_error", "Error processing payment")
        })?
        .ok_or(ApiError::NotFound { code: "order_not_found", message: "Order not found" })?;

    if order.user_id != user.id {
        return Err(ApiError::Forbidden { message: "You do not have access to this order" });
    }

    debug!(
        order_id = %order.id,
        method = req.payment_method.as_deref().unwrap_or("PAY_PAGE"),
        token_present = req.payment_token.is_some(),
        "initiating hosted checkout"
    );

    match state.gateway.initiate_payment(&order, &user).await {
        Ok(ack) => {
            let updated = state
                .orders
                .mark_paid(order.id, &ack.transaction_id)
                .await
                .map_err(|err| {
                    error!(error = %err, order_id = %order.id, "Failed to persist paid order");
                    ApiError::bad_request("payment_error", "Error processing payment")
                })?;
            match updated {
                Some(_) => Ok(Json(PayAck {
                    message: "Order paid successfully",
                    phone_pe_transaction_id: ack.transaction_id,
                })),
                // The conditional update missed: the order was not in
                // `created` anymore (already paid, or a concurrent attempt won).
                None => Err(ApiError::Conflict {
                    code: "order_not_payable",
                    message: "Order is not awaiting payment".to_string(),
                }),
            }
        }
        Err(err) => {
            error!(error = %err, order_id = %order.id, "Payment API error");
            Err(ApiError::gateway(err))
        }
    }
}

pub async fn payment_status(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> ApiResult<Json<StatusAck>> {
    let order = state
        .orders
        .find_by_transaction(&transaction_id)
        .await
        .map_err(|err| {
            error!(error = %err, transaction_id = %transaction_id, "Failed to look up order status");
            ApiError::bad_request("status_error", "Error retrieving order status")
        })?
        .ok_or(ApiError::NotFound { code: "order_not_found", message: "Order not found" })?;

    Ok(Json(StatusAck {
        message: "Order status retrieved successfully",
        status: order.status,
        transaction_id,
    }))
}
