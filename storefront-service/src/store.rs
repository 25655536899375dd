use anyhow::Result;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub price: BigDecimal,
    pub description: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub items: Json<Vec<OrderItem>>,
    pub total: BigDecimal,
    pub status: String,
    pub transaction_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Created,
    Paid,
    Failed,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Created => "created",
            OrderStatus::Paid => "paid",
            OrderStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<OrderStatus> {
        match s {
            "created" => Some(OrderStatus::Created),
            "paid" => Some(OrderStatus::Paid),
            "failed" => Some(OrderStatus::Failed),
            _ => None,
        }
    }
}

#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    async fn insert_user(&self, user: &User) -> Result<()>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_session(
        &self,
        token_hash: Vec<u8>,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<()>;
    async fn find_user_by_session(
        &self,
        token_hash: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Option<User>>;
}

#[async_trait::async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Product>>;
    async fn find(&self, id: Uuid) -> Result<Option<Product>>;
    async fn insert(&self, product: &Product) -> Result<()>;
    /// Returns false if no product with this id exists.
    async fn update(&self, product: &Product) -> Result<bool>;
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait::async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert(&self, order: &Order) -> Result<()>;
    async fn find(&self, id: Uuid) -> Result<Option<Order>>;
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;
    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Order>>;
    /// Transition `created -> paid` and record the transaction identifier.
    /// The update is conditional on the persisted status still being
    /// `created`; a guard miss (already paid, or a concurrent attempt won)
    /// returns None and leaves the row untouched.
    async fn mark_paid(&self, id: Uuid, transaction_id: &str) -> Result<Option<Order>>;
}
