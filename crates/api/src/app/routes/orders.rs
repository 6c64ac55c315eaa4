use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use stockflow_cart::Cart;
use stockflow_core::{OrderId, ProductId};
use stockflow_infra::{place_order, StoreError};
use stockflow_orders::{CustomerDetails, OrderStatus};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Checkout: build a cart from the request lines, then run placement.
///
/// Each line is priced against the current catalog record; placement
/// snapshots those prices into the order items.
pub async fn checkout(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CheckoutRequest>,
) -> axum::response::Response {
    let mut cart = Cart::new();
    for line in &body.items {
        let product_id: ProductId = match line.product_id.parse() {
            Ok(v) => v,
            Err(_) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id")
            }
        };

        let product = match services.backend.get_product(product_id).await {
            Ok(p) => p,
            Err(StoreError::NotFound) => {
                return errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "unknown_product",
                    format!("no such product: {product_id}"),
                )
            }
            Err(e) => return errors::store_error_to_response(e),
        };

        if let Err(e) = cart.add(product, line.quantity) {
            return errors::domain_error_to_response(e);
        }
    }

    let customer = CustomerDetails {
        name: body.customer_name,
        email: body.customer_email,
    };

    match place_order(services.backend.as_ref(), &cart, &customer).await {
        Ok(confirmation) => {
            (StatusCode::CREATED, Json(dto::confirmation_to_json(&confirmation))).into_response()
        }
        Err(e) => errors::placement_error_to_response(e),
    }
}

/// Public order tracking by id, or newest order for an email.
pub async fn track(
    Extension(services): Extension<Arc<AppServices>>,
    Query(query): Query<dto::TrackQuery>,
) -> axum::response::Response {
    let result = if let Some(id) = query.id.as_deref() {
        let id: OrderId = match id.trim().parse() {
            Ok(v) => v,
            Err(_) => {
                return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id")
            }
        };
        services.backend.order_by_id(id).await
    } else if let Some(email) = query.email.as_deref() {
        services
            .backend
            .latest_order_by_email(&email.trim().to_lowercase())
            .await
    } else {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "provide an order id or an email",
        );
    };

    match result {
        Ok(order) => (StatusCode::OK, Json(dto::order_to_json(&order))).into_response(),
        // A miss is a normal outcome for tracking, not a backend failure.
        Err(StoreError::NotFound) => {
            errors::json_error(StatusCode::NOT_FOUND, "not_found", "no matching order")
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

/// Admin listing: every order with items and timeline, newest first.
pub async fn list_orders(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let orders = match services.backend.list_orders().await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };

    let items = orders.iter().map(dto::order_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

/// Set an order's status. Any known status is accepted, including moves
/// backward in the sequence; last write wins.
pub async fn update_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateStatusRequest>,
) -> axum::response::Response {
    let id: OrderId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid order id"),
    };

    let status: OrderStatus = match body.status.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(
                StatusCode::BAD_REQUEST,
                "invalid_status",
                "status must be one of: pending, confirmed, shipped, delivered",
            )
        }
    };

    match services.backend.set_order_status(id, status).await {
        Ok(()) => {
            tracing::info!(order_id = %id, status = status.as_str(), "order status updated");
            (
                StatusCode::OK,
                Json(serde_json::json!({
                    "id": id.to_string(),
                    "status": status.as_str(),
                })),
            )
                .into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
