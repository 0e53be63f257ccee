use std::sync::Arc;

use comercio_auth::AuthConfig;
use comercio_infra::{
    InMemoryAccountStore, InMemoryPermissionStore, PgAccountStore, PgPermissionStore,
};

#[tokio::main]
async fn main() {
    comercio_observability::init();

    let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret-change-me-before-deploying".to_string()
    });
    let config = AuthConfig::new(secret);

    let app = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pool = sqlx::PgPool::connect(&url)
                .await
                .expect("failed to connect to Postgres");
            comercio_api::app::build_app(
                config,
                Arc::new(PgAccountStore::new(pool.clone())),
                Arc::new(PgPermissionStore::new(pool)),
            )
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using empty in-memory stores (dev only)");
            comercio_api::app::build_app(
                config,
                Arc::new(InMemoryAccountStore::new()),
                Arc::new(InMemoryPermissionStore::new()),
            )
        }
    }
    .expect("failed to build app");

    let bind = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .unwrap_or_else(|e| panic!("failed to bind {bind}: {e}"));

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
