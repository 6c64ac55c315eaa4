//! HTTP API application wiring (Axum router + service wiring).
//!
//! Layout:
//! - `services.rs`: shared request state (store backend, token service, admin credentials)
//! - `routes/`: HTTP routes + handlers (one file per area)
//! - `dto.rs`: request/response DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};

use stockflow_auth::Hs256TokenService;
use stockflow_infra::Backend;

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Static configuration for the API process.
pub struct AppConfig {
    pub jwt_secret: String,
    pub admin_email: String,
    pub admin_password: String,
}

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: AppConfig, backend: Arc<dyn Backend>) -> Router {
    let tokens = Arc::new(Hs256TokenService::new(config.jwt_secret.as_bytes()));
    let auth_state = middleware::AuthState {
        tokens: tokens.clone(),
    };

    let services = Arc::new(services::AppServices::new(
        backend,
        tokens,
        config.admin_email,
        config.admin_password,
    ));

    // Admin routes require a valid bearer token.
    let admin = routes::admin_router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    routes::public_router()
        .route("/health", get(routes::system::health))
        .nest("/admin", admin)
        .layer(Extension(services))
}
