use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::store::{Order, OrderStatus, OrderStore, Product, ProductStore, User, UserStore};

const ORDER_COLUMNS: &str = "id, user_id, items, total, status, transaction_id, created_at";

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, phone, email, password_hash) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.phone)
        .bind(&user.email)
        .bind(&user.password_hash)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let rec = sqlx::query_as::<_, User>(
            "SELECT id, name, phone, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn create_session(
        &self,
        token_hash: Vec<u8>,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query("INSERT INTO sessions (token_hash, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(token_hash)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find_user_by_session(
        &self,
        token_hash: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let rec = sqlx::query_as::<_, User>(
            r#"SELECT u.id, u.name, u.phone, u.email, u.password_hash
               FROM sessions s
               JOIN users u ON u.id = s.user_id
               WHERE s.token_hash = $1 AND s.expires_at > $2"#,
        )
        .bind(token_hash)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }
}

#[async_trait::async_trait]
impl ProductStore for PgStore {
    async fn list(&self) -> Result<Vec<Product>> {
        let recs = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description, active FROM products WHERE active = TRUE ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(recs)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Product>> {
        let rec = sqlx::query_as::<_, Product>(
            "SELECT id, name, price, description, active FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn insert(&self, product: &Product) -> Result<()> {
        sqlx::query(
            "INSERT INTO products (id, name, price, description, active) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.price)
        .bind(&product.description)
        .bind(product.active)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE products SET name = $2, price = $3, description = $4, active = $5 WHERE id = $1",
        )
        .bind(product.id)
        .bind(&product.name)
        .bind(&product.price)
        .bind(&product.description)
        .bind(product.active)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait::async_trait]
impl OrderStore for PgStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        sqlx::query(
            "INSERT INTO orders (id, user_id, items, total, status, transaction_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(order.id)
        .bind(order.user_id)
        .bind(order.items.clone())
        .bind(&order.total)
        .bind(&order.status)
        .bind(order.transaction_id.as_deref())
        .bind(order.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Order>> {
        let rec = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        let recs = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(recs)
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Order>> {
        let rec = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE transaction_id = $1"
        ))
        .bind(transaction_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }

    async fn mark_paid(&self, id: Uuid, transaction_id: &str) -> Result<Option<Order>> {
        let rec = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $2, transaction_id = $3
             WHERE id = $1 AND status = $4
             RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .bind(OrderStatus::Paid.as_str())
        .bind(transaction_id)
        .bind(OrderStatus::Created.as_str())
        .fetch_optional(&self.pool)
        .await?;
        Ok(rec)
    }
}
