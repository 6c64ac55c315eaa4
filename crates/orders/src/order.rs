use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult, OrderId, ProductId};

use crate::status::OrderStatus;

/// A persisted purchase record.
///
/// `total_cents` is computed once from the cart snapshot at submit time and
/// never re-derived from line items. `status` is the only field mutated after
/// creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub status: OrderStatus,
    /// Total in smallest currency unit (e.g., cents).
    pub total_cents: u64,
    pub created_at: DateTime<Utc>,
}

/// Order fields supplied by the caller; id, status and timestamp are
/// backend-generated on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_name: String,
    pub customer_email: String,
    pub total_cents: u64,
}

/// An immutable line entry belonging to exactly one order.
///
/// `unit_price_cents` snapshots the product's price at order time and must
/// not be re-read from the catalog later, to preserve historical pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i64,
    pub unit_price_cents: u64,
}

/// An order line joined with its product's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemDetail {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price_cents: u64,
}

impl OrderItemDetail {
    pub fn subtotal_cents(&self) -> u64 {
        self.unit_price_cents * self.quantity as u64
    }
}

/// An order joined with its line items, as read back for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItemDetail>,
}

/// Customer identity supplied at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
}

impl CustomerDetails {
    /// Validate and normalize: both fields required, email lowercased before
    /// storage.
    pub fn normalized(&self) -> DomainResult<CustomerDetails> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("customer name is required"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(DomainError::validation("customer email is required"));
        }
        Ok(CustomerDetails {
            name: name.to_string(),
            email: email.to_lowercase(),
        })
    }
}
