use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use stockflow_core::DomainError;
use stockflow_infra::{PlacementError, StoreError};

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Unauthorized => json_error(StatusCode::FORBIDDEN, "unauthorized", "unauthorized"),
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::InsufficientStock { .. } => {
            json_error(StatusCode::CONFLICT, "insufficient_stock", err.to_string())
        }
        StoreError::Backend(msg) => json_error(StatusCode::BAD_GATEWAY, "store_error", msg),
    }
}

pub fn placement_error_to_response(err: PlacementError) -> axum::response::Response {
    match err {
        PlacementError::Validation(e) => domain_error_to_response(e),
        PlacementError::Backend {
            source: source @ StoreError::InsufficientStock { .. },
            ..
        } => json_error(StatusCode::CONFLICT, "insufficient_stock", source.to_string()),
        PlacementError::Backend {
            stage,
            partial_index,
            source,
        } => {
            // The stage (and line, for decrements) tells an operator what was
            // already written before the failure.
            let mut message = format!("order placement failed at {stage} stage: {source}");
            if let Some(line) = partial_index {
                message.push_str(&format!(" (line {line})"));
            }
            json_error(StatusCode::BAD_GATEWAY, "placement_failed", message)
        }
    }
}
