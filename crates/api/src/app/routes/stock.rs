use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use stockflow_catalog::{aggregate, alert_list};

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Stock dashboard: aggregate stats, the sorted alert list, and the full
/// catalog with tier labels.
///
/// Everything here is derived from the catalog on every request, never
/// persisted.
pub async fn overview(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let products = match services.backend.list_products().await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };

    let stats = aggregate(&products);
    let alerts = alert_list(&products)
        .iter()
        .map(dto::product_to_json)
        .collect::<Vec<_>>();
    let overview = products.iter().map(dto::product_to_json).collect::<Vec<_>>();

    (
        StatusCode::OK,
        Json(json!({
            "stats": stats,
            "alerts": alerts,
            "overview": overview,
        })),
    )
        .into_response()
}
