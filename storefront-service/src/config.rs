use anyhow::{Context, Result};
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
        let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);
        Ok(Self { host, port, database_url })
    }
}

/// Payment-provider credentials and endpoints, injected at startup instead of
/// living as module globals. Defaults are the provider's public sandbox values.
#[derive(Debug, Clone)]
pub struct PhonePeConfig {
    pub merchant_id: String,
    pub salt_key: String,
    pub salt_index: u32,
    pub base_url: String,
    /// Base for the redirect URL the hosted checkout page sends the shopper
    /// back to; the transaction id is appended under /orders/status/.
    pub redirect_base_url: String,
}

impl PhonePeConfig {
    pub fn from_env() -> Self {
        let merchant_id =
            env::var("PHONEPE_MERCHANT_ID").unwrap_or_else(|_| "PGTESTPAYUAT".to_string());
        let salt_key = env::var("PHONEPE_SALT_KEY")
            .unwrap_or_else(|_| "099eb0cd-02cf-4e2a-8aca-3e6c6aff0399".to_string());
        let salt_index = env::var("PHONEPE_SALT_INDEX")
            .ok()
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(1);
        let base_url = env::var("PHONEPE_BASE_URL")
            .unwrap_or_else(|_| "https://api-preprod.phonepe.com/apis/pg-sandbox".to_string());
        let redirect_base_url = env::var("PAYMENT_REDIRECT_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3001/api/v1".to_string());

        Self {
            merchant_id,
            salt_key,
            salt_index,
            base_url,
            redirect_base_url,
        }
    }
}
