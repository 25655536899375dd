pub mod app;
pub mod checksum;
pub mod config;
pub mod gateway;
pub mod order_handlers;
pub mod payment_handlers;
pub mod pg_store;
pub mod product_handlers;
pub mod sessions;
pub mod store;
pub mod user_handlers;

pub use app::{build_router, AppState};
