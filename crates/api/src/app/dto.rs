//! Request DTOs and response JSON mapping helpers.

use serde::Deserialize;
use serde_json::json;

use stockflow_catalog::{classify, max_purchasable, Product};
use stockflow_infra::OrderConfirmation;
use stockflow_orders::{timeline, OrderWithItems};

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price_cents: u64,
    pub stock: i64,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Partial product update. Absent fields are left unchanged; `description`
/// and `image_url` cannot be cleared through this endpoint, only replaced.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price_cents: Option<u64>,
    #[serde(default)]
    pub stock: Option<i64>,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutItemRequest {
    pub product_id: String,
    pub quantity: i64,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub items: Vec<CheckoutItemRequest>,
}

/// Lookup key for order tracking: an order id, or the email whose newest
/// order should be returned. Id wins when both are present.
#[derive(Debug, Deserialize)]
pub struct TrackQuery {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

pub fn product_to_json(p: &Product) -> serde_json::Value {
    json!({
        "id": p.id.to_string(),
        "name": p.name,
        "description": p.description,
        "price_cents": p.price_cents,
        "stock": p.stock,
        "image_url": p.image_url,
        "created_at": p.created_at,
        "stock_status": classify(p.stock).label(),
        "max_purchasable": max_purchasable(p),
    })
}

pub fn order_to_json(o: &OrderWithItems) -> serde_json::Value {
    let items = o
        .items
        .iter()
        .map(|i| {
            json!({
                "product_id": i.product_id.to_string(),
                "product_name": i.product_name,
                "quantity": i.quantity,
                "unit_price_cents": i.unit_price_cents,
                "subtotal_cents": i.subtotal_cents(),
            })
        })
        .collect::<Vec<_>>();

    let timeline = timeline(o.order.status)
        .iter()
        .map(|step| {
            json!({
                "status": step.status.as_str(),
                "active": step.active,
                "passed": step.passed,
            })
        })
        .collect::<Vec<_>>();

    json!({
        "id": o.order.id.to_string(),
        "customer_name": o.order.customer_name,
        "customer_email": o.order.customer_email,
        "status": o.order.status.as_str(),
        "total_cents": o.order.total_cents,
        "created_at": o.order.created_at,
        "items": items,
        "timeline": timeline,
    })
}

pub fn confirmation_to_json(c: &OrderConfirmation) -> serde_json::Value {
    json!({
        "order_id": c.order_id.to_string(),
        "customer_name": c.customer_name,
        "customer_email": c.customer_email,
        "total_cents": c.total_cents,
    })
}
