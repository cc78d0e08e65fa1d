use std::sync::Arc;

use padron_api::database::store::SharedStore;
use padron_api::database::{ddl, manager, MemoryStore, PgResourceStore};
use padron_api::policy::CapabilityPolicy;
use padron_api::{api, config};

#[tokio::main]
async fn main() {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    let config = config::config();

    tracing_subscriber::fmt::init();
    tracing::info!("Starting Padron API in {:?} mode", config.environment);

    let store: SharedStore = match std::env::var("DATABASE_URL") {
        Ok(_) => {
            let pool = manager::connect_from_env()
                .await
                .unwrap_or_else(|e| panic!("failed to connect database: {}", e));
            ddl::ensure_tables(&pool)
                .await
                .unwrap_or_else(|e| panic!("failed to prepare tables: {}", e));
            Arc::new(PgResourceStore::new(pool))
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store (data is not persisted)");
            Arc::new(MemoryStore::new())
        }
    };

    let app = api::router(store, Arc::new(CapabilityPolicy));

    // Allow tests or deployments to override port via env
    let port = std::env::var("PADRON_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {}: {}", bind_addr, e));

    println!("Padron API server listening on http://{}", bind_addr);

    axum::serve(listener, app).await.expect("server");
}
