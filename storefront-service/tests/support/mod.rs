use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Result};
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use sqlx::types::Json;
use tower::ServiceExt;
use uuid::Uuid;

use storefront_service::gateway::{GatewayAck, GatewayError, PaymentGateway};
use storefront_service::sessions::hash_session_token;
use storefront_service::store::{
    Order, OrderStatus, OrderStore, Product, ProductStore, User, UserStore,
};
use storefront_service::AppState;

/// In-memory Record Store used by router tests in place of Postgres.
#[derive(Default)]
pub struct MemoryStore {
    pub users: Mutex<Vec<User>>,
    pub sessions: Mutex<HashMap<Vec<u8>, (Uuid, DateTime<Utc>)>>,
    pub products: Mutex<Vec<Product>>,
    pub orders: Mutex<Vec<Order>>,
}

#[async_trait::async_trait]
impl UserStore for MemoryStore {
    async fn insert_user(&self, user: &User) -> Result<()> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(anyhow!("duplicate email"));
        }
        users.push(user.clone());
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn create_session(
        &self,
        token_hash: Vec<u8>,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<()> {
        self.sessions.lock().unwrap().insert(token_hash, (user_id, expires_at));
        Ok(())
    }

    async fn find_user_by_session(
        &self,
        token_hash: &[u8],
        now: DateTime<Utc>,
    ) -> Result<Option<User>> {
        let sessions = self.sessions.lock().unwrap();
        let Some((user_id, expires_at)) = sessions.get(token_hash) else {
            return Ok(None);
        };
        if *expires_at <= now {
            return Ok(None);
        }
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == *user_id).cloned())
    }
}

#[async_trait::async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.products.lock().unwrap().iter().filter(|p| p.active).cloned().collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Product>> {
        Ok(self.products.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, product: &Product) -> Result<()> {
        self.products.lock().unwrap().push(product.clone());
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool> {
        let mut products = self.products.lock().unwrap();
        match products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let mut products = self.products.lock().unwrap();
        let before = products.len();
        products.retain(|p| p.id != id);
        Ok(products.len() < before)
    }
}

#[async_trait::async_trait]
impl OrderStore for MemoryStore {
    async fn insert(&self, order: &Order) -> Result<()> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self.orders.lock().unwrap().iter().find(|o| o.id == id).cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
        Ok(self.orders.lock().unwrap().iter().filter(|o| o.user_id == user_id).cloned().collect())
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> Result<Option<Order>> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .find(|o| o.transaction_id.as_deref() == Some(transaction_id))
            .cloned())
    }

    async fn mark_paid(&self, id: Uuid, transaction_id: &str) -> Result<Option<Order>> {
        let mut orders = self.orders.lock().unwrap();
        match orders
            .iter_mut()
            .find(|o| o.id == id && o.status == OrderStatus::Created.as_str())
        {
            Some(order) => {
                order.status = OrderStatus::Paid.as_str().to_string();
                order.transaction_id = Some(transaction_id.to_string());
                Ok(Some(order.clone()))
            }
            None => Ok(None),
        }
    }
}

/// Gateway double with a fixed outcome and a call counter.
pub struct StubGateway {
    result: Mutex<Result<String, String>>,
    calls: AtomicUsize,
}

impl StubGateway {
    pub fn approving(transaction_id: &str) -> Self {
        Self { result: Mutex::new(Ok(transaction_id.to_string())), calls: AtomicUsize::new(0) }
    }

    pub fn declining(message: &str) -> Self {
        Self { result: Mutex::new(Err(message.to_string())), calls: AtomicUsize::new(0) }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PaymentGateway for StubGateway {
    async fn initiate_payment(
        &self,
        _order: &Order,
        _payer: &User,
    ) -> Result<GatewayAck, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &*self.result.lock().unwrap() {
            Ok(transaction_id) => Ok(GatewayAck { transaction_id: transaction_id.clone() }),
            Err(message) => Err(GatewayError::Declined(message.clone())),
        }
    }
}

pub fn test_state(store: &Arc<MemoryStore>, gateway: Arc<StubGateway>) -> AppState {
    AppState {
        users: store.clone(),
        products: store.clone(),
        orders: store.clone(),
        gateway,
    }
}

pub fn seed_user(store: &MemoryStore, email: &str) -> (User, String) {
    let user = User {
        id: Uuid::new_v4(),
        name: "Asha".to_string(),
        phone: "9999999999".to_string(),
        email: email.to_string(),
        password_hash: "unused".to_string(),
    };
    store.users.lock().unwrap().push(user.clone());
    let token = format!("test-session-{}", user.id);
    let expires_at = Utc::now() + Duration::hours(1);
    store.sessions.lock().unwrap().insert(hash_session_token(&token), (user.id, expires_at));
    (user, token)
}

pub fn seed_order(store: &MemoryStore, user_id: Uuid, total: &str, status: &str) -> Order {
    let order = Order {
        id: Uuid::new_v4(),
        user_id,
        items: Json(vec![]),
        total: BigDecimal::parse_bytes(total.as_bytes(), 10).unwrap(),
        status: status.to_string(),
        transaction_id: None,
        created_at: Utc::now(),
    };
    store.orders.lock().unwrap().push(order.clone());
    order
}

pub fn request(
    method: &str,
    uri: &str,
    bearer: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn send(app: &Router, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 64).await.unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, value)
}
