use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::checksum;
use crate::config::PhonePeConfig;
use crate::store::{Order, User};

pub const PAY_API_PATH: &str = "/pg/v1/pay";

#[derive(Debug, Serialize)]
pub struct PaymentInstrument {
    #[serde(rename = "type")]
    pub kind: &'static str,
}

/// The hosted-checkout request sent to the provider. Built fresh per payment
/// attempt and discarded after dispatch; never persisted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub merchant_id: String,
    pub merchant_transaction_id: String,
    pub merchant_user_id: String,
    pub name: String,
    /// Minor currency units.
    pub amount: i64,
    pub redirect_url: String,
    pub redirect_mode: &'static str,
    pub mobile_number: String,
    pub payment_instrument: PaymentInstrument,
}

#[derive(Debug, Deserialize)]
pub struct GatewayAck {
    #[serde(rename = "transactionId")]
    pub transaction_id: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("{0}")]
    Declined(String),
    #[error("payment provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("failed to encode payment request: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("payment provider returned an unreadable acknowledgment")]
    MalformedAck,
    #[error("order total is not representable in minor units")]
    Amount,
}

#[async_trait::async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Initiate a hosted-checkout payment for `order` on behalf of `payer`.
    /// Succeeds with the provider's transaction identifier; the caller must
    /// not assume anything was charged on failure.
    async fn initiate_payment(&self, order: &Order, payer: &User)
        -> Result<GatewayAck, GatewayError>;
}

pub struct PhonePeGateway {
    http: reqwest::Client,
    config: PhonePeConfig,
}

impl PhonePeGateway {
    pub fn new(config: PhonePeConfig) -> Self {
        Self { http: reqwest::Client::new(), config }
    }

    /// One id per attempt, threaded through both `merchantTransactionId` and
    /// the redirect URL so the status callback and the payment request agree.
    fn new_transaction_id() -> String {
        rand::thread_rng().gen_range(100_000_000u64..1_000_000_000).to_string()
    }

    fn build_request(
        &self,
        order: &Order,
        payer: &User,
        transaction_id: &str,
    ) -> Result<PaymentRequest, GatewayError> {
        let amount = common_money::to_minor_units(&order.total).ok_or(GatewayError::Amount)?;
        Ok(PaymentRequest {
            merchant_id: self.config.merchant_id.clone(),
            merchant_transaction_id: transaction_id.to_string(),
            merchant_user_id: format!("MUID{}", payer.id),
            name: payer.name.clone(),
            amount,
            redirect_url: format!(
                "{}/orders/status/{}",
                self.config.redirect_base_url, transaction_id
            ),
            redirect_mode: "POST",
            mobile_number: payer.phone.clone(),
            payment_instrument: PaymentInstrument { kind: "PAY_PAGE" },
        })
    }
}

#[async_trait::async_trait]
impl PaymentGateway for PhonePeGateway {
    async fn initiate_payment(
        &self,
        order: &Order,
        payer: &User,
    ) -> Result<GatewayAck, GatewayError> {
        let transaction_id = Self::new_transaction_id();
        let request = self.build_request(order, payer, &transaction_id)?;

        let payload = STANDARD.encode(serde_json::to_vec(&request)?);
        let verify = checksum::sign(
            &payload,
            PAY_API_PATH,
            &self.config.salt_key,
            self.config.salt_index,
        );

        let url = format!("{}{}", self.config.base_url, PAY_API_PATH);
        tracing::debug!(merchant_transaction_id = %transaction_id, order_id = %order.id, "dispatching pay request");
        let resp = self
            .http
            .post(&url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .header("X-VERIFY", verify)
            .json(&serde_json::json!({ "request": payload }))
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            // Surface the provider's own message when the body carries one.
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(str::to_owned))
                .unwrap_or_else(|| format!("payment provider returned {status}"));
            return Err(GatewayError::Declined(message));
        }

        resp.json::<GatewayAck>().await.map_err(|_| GatewayError::MalformedAck)
    }
}
