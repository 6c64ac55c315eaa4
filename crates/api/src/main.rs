use std::sync::Arc;

use stockflow_api::app::{build_app, AppConfig};
use stockflow_infra::{Backend, InMemoryBackend, PostgresBackend};

#[tokio::main]
async fn main() {
    stockflow_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });
    let admin_email =
        std::env::var("ADMIN_EMAIL").unwrap_or_else(|_| "admin@stockflow.local".to_string());
    let admin_password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        tracing::warn!("ADMIN_PASSWORD not set; using insecure dev default");
        "admin".to_string()
    });

    let backend: Arc<dyn Backend> = match std::env::var("DATABASE_URL") {
        Ok(url) => {
            let pg = PostgresBackend::connect(&url)
                .await
                .expect("failed to connect to database");
            pg.ensure_schema()
                .await
                .expect("failed to create database schema");
            Arc::new(pg)
        }
        Err(_) => {
            tracing::warn!("DATABASE_URL not set; using in-memory store");
            Arc::new(InMemoryBackend::new())
        }
    };

    let app = build_app(
        AppConfig {
            jwt_secret,
            admin_email,
            admin_password,
        },
        backend,
    );

    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("failed to bind 0.0.0.0:8080");

    tracing::info!("listening on {}", listener.local_addr().unwrap());

    axum::serve(listener, app).await.unwrap();
}
