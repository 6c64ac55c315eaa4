use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use stockflow_catalog::{NewProduct, ProductPatch};
use stockflow_core::ProductId;

use crate::app::{dto, errors};
use crate::app::services::AppServices;

/// Admin listing: every product, including out-of-stock ones.
pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let products = match services.backend.list_products().await {
        Ok(v) => v,
        Err(e) => return errors::store_error_to_response(e),
    };

    let items = products.iter().map(dto::product_to_json).collect::<Vec<_>>();
    (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
}

pub async fn create_product(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateProductRequest>,
) -> axum::response::Response {
    let draft = NewProduct {
        name: body.name,
        description: body.description,
        price_cents: body.price_cents,
        stock: body.stock,
        image_url: body.image_url,
    };
    if let Err(e) = draft.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.backend.create_product(draft).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "product created");
            (StatusCode::CREATED, Json(dto::product_to_json(&product))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateProductRequest>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    let patch = ProductPatch {
        name: body.name,
        description: body.description.map(Some),
        price_cents: body.price_cents,
        stock: body.stock,
        image_url: body.image_url.map(Some),
    };
    if let Err(e) = patch.validate() {
        return errors::domain_error_to_response(e);
    }

    match services.backend.update_product(id, patch).await {
        Ok(product) => (StatusCode::OK, Json(dto::product_to_json(&product))).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: ProductId = match id.parse() {
        Ok(v) => v,
        Err(_) => return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid product id"),
    };

    match services.backend.delete_product(id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "product deleted");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}
