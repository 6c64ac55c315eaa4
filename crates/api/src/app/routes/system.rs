use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::context::AdminContext;

pub async fn health() -> axum::response::Response {
    (StatusCode::OK, Json(json!({ "status": "ok" }))).into_response()
}

/// Echo the authenticated admin identity (who am I).
pub async fn session(Extension(admin): Extension<AdminContext>) -> axum::response::Response {
    (
        StatusCode::OK,
        Json(json!({
            "user_id": admin.user_id().to_string(),
            "email": admin.email(),
        })),
    )
        .into_response()
}
