use std::net::SocketAddr;
use std::sync::Arc;

use sqlx::PgPool;
use tokio::net::TcpListener;

use storefront_service::config::{AppConfig, PhonePeConfig};
use storefront_service::gateway::PhonePeGateway;
use storefront_service::pg_store::PgStore;
use storefront_service::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let config = AppConfig::from_env()?;
    // Initialize database connection pool
    let db = PgPool::connect(&config.database_url).await?;
    // Ensure database schema is up to date before serving traffic
    sqlx::migrate!("./migrations").run(&db).await?;

    let store = Arc::new(PgStore::new(db));
    let gateway = Arc::new(PhonePeGateway::new(PhonePeConfig::from_env()));
    let state = AppState {
        users: store.clone(),
        products: store.clone(),
        orders: store,
        gateway,
    };
    let app = build_router(state);

    let ip: std::net::IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((ip, config.port));
    println!("starting storefront-service on {addr}");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
