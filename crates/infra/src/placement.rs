//! Order placement flow.
//!
//! Turns a non-empty cart plus customer identity into a persisted order, its
//! line items, and decremented stock. The three stages run strictly
//! sequentially as independent backend calls, so a failure carries a precise
//! stage (and line index for decrements) and a mid-sequence failure leaves a
//! documented partial write: the earlier rows stay persisted, with no
//! compensating rollback. There are no retries and no idempotency key; a
//! re-submitted checkout creates a second order.

use serde::Serialize;
use thiserror::Error;

use stockflow_cart::Cart;
use stockflow_core::{DomainError, OrderId};
use stockflow_orders::{CustomerDetails, OrderDraft, OrderItem};

use crate::backend::{Backend, StoreError};

/// Which backend write of the placement sequence failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementStage {
    /// The order row insert. Nothing has been written.
    Order,
    /// The line item insert. The order row exists with no items.
    Items,
    /// A per-line stock decrement. Order and items exist; decrements before
    /// the failing line have been applied.
    Stock,
}

impl PlacementStage {
    pub fn as_str(self) -> &'static str {
        match self {
            PlacementStage::Order => "order",
            PlacementStage::Items => "items",
            PlacementStage::Stock => "stock",
        }
    }
}

impl core::fmt::Display for PlacementStage {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum PlacementError {
    /// Rejected before any backend call.
    #[error(transparent)]
    Validation(#[from] DomainError),

    /// A backend write failed at the given stage.
    #[error("order placement failed at {stage} stage: {source}")]
    Backend {
        stage: PlacementStage,
        /// Index of the failing cart line, for the stock stage.
        partial_index: Option<usize>,
        source: StoreError,
    },
}

impl PlacementError {
    fn at(stage: PlacementStage, source: StoreError) -> Self {
        Self::Backend {
            stage,
            partial_index: None,
            source,
        }
    }
}

/// Confirmation returned to the customer on full success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub customer_name: String,
    pub customer_email: String,
    pub total_cents: u64,
}

/// Place an order from the cart snapshot.
///
/// Sequence: validate, insert the order row (yielding the parent id), insert
/// one item row per cart line with snapshotted unit prices, then decrement
/// each product's stock in cart order via the backend's atomic conditional
/// decrement. The caller clears the cart on success.
pub async fn place_order(
    backend: &dyn Backend,
    cart: &Cart,
    customer: &CustomerDetails,
) -> Result<OrderConfirmation, PlacementError> {
    if cart.is_empty() {
        return Err(DomainError::validation("cart is empty").into());
    }
    let customer = customer.normalized()?;

    // Computed once from the cart snapshot; never re-derived from line items.
    let total_cents = cart.total_cents();

    let order = backend
        .insert_order(OrderDraft {
            customer_name: customer.name.clone(),
            customer_email: customer.email.clone(),
            total_cents,
        })
        .await
        .map_err(|e| PlacementError::at(PlacementStage::Order, e))?;

    let items: Vec<OrderItem> = cart
        .items()
        .iter()
        .map(|line| OrderItem {
            order_id: order.id,
            product_id: line.product.id,
            quantity: line.quantity,
            unit_price_cents: line.product.price_cents,
        })
        .collect();

    if let Err(e) = backend.insert_order_items(&items).await {
        tracing::warn!(
            order_id = %order.id,
            "order item write failed; order row remains without items"
        );
        return Err(PlacementError::at(PlacementStage::Items, e));
    }

    for (index, line) in cart.items().iter().enumerate() {
        if let Err(e) = backend.decrement_stock(line.product.id, line.quantity).await {
            tracing::warn!(
                order_id = %order.id,
                product_id = %line.product.id,
                line = index,
                "stock decrement failed mid-sequence; earlier decrements stand"
            );
            return Err(PlacementError::Backend {
                stage: PlacementStage::Stock,
                partial_index: Some(index),
                source: e,
            });
        }
    }

    tracing::info!(order_id = %order.id, total_cents, "order placed");

    Ok(OrderConfirmation {
        order_id: order.id,
        customer_name: customer.name,
        customer_email: customer.email,
        total_cents,
    })
}
