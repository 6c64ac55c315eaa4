use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

pub async fn sign_in(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::SignInRequest>,
) -> axum::response::Response {
    if !services.check_credentials(&body.email, &body.password) {
        // Same response for unknown email and wrong password.
        return errors::json_error(
            StatusCode::UNAUTHORIZED,
            "invalid_credentials",
            "email or password is incorrect",
        );
    }

    let (token, claims) = match services.issue_session() {
        Ok(v) => v,
        Err(e) => {
            tracing::error!(error = %e, "failed to sign session token");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "failed to open session",
            );
        }
    };

    tracing::info!(email = %claims.email, "admin signed in");

    (
        StatusCode::OK,
        Json(json!({
            "token": token,
            "expires_at": claims.expires_at,
        })),
    )
        .into_response()
}
