//! Remote data-backend interface.
//!
//! Every call is an independent network round-trip against one logical table;
//! there is no cross-call transaction. A zero-rows outcome for single-row
//! lookups is [`StoreError::NotFound`], distinguished from all other
//! failures so callers can render an empty state instead of an error.

use async_trait::async_trait;
use thiserror::Error;

use stockflow_catalog::{NewProduct, Product, ProductPatch};
use stockflow_core::{OrderId, ProductId};
use stockflow_orders::{Order, OrderDraft, OrderItem, OrderStatus, OrderWithItems};

/// Store-level error.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Zero rows matched a single-row lookup. A normal outcome, not a failure.
    #[error("no rows matched")]
    NotFound,

    /// A conditional stock decrement found fewer units than requested.
    #[error(
        "insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// Any other backend failure, carrying the raw error message.
    #[error("backend call failed: {0}")]
    Backend(String),
}

/// Data backend over the logical `products`, `orders` and `order_items`
/// tables.
///
/// Ids and creation timestamps are generated by the store on insert; the
/// inserted row is returned so callers can reference it (the order id is the
/// parent key for line items).
#[async_trait]
pub trait Backend: Send + Sync {
    /// All products, newest first.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Products with stock > 0, newest first (the storefront grid).
    async fn list_in_stock_products(&self) -> Result<Vec<Product>, StoreError>;

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError>;

    async fn create_product(&self, draft: NewProduct) -> Result<Product, StoreError>;

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, StoreError>;

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError>;

    /// Atomic conditional decrement: subtract `quantity` only where the
    /// stored stock is at least `quantity`, otherwise fail with
    /// [`StoreError::InsufficientStock`]. Never drives stock negative, even
    /// under concurrent purchasers.
    async fn decrement_stock(&self, id: ProductId, quantity: i64) -> Result<(), StoreError>;

    /// Insert an order row with status `pending`; returns the stored order
    /// including its generated id and timestamp.
    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, StoreError>;

    async fn insert_order_items(&self, items: &[OrderItem]) -> Result<(), StoreError>;

    /// An order joined with its items and their product names.
    async fn order_by_id(&self, id: OrderId) -> Result<OrderWithItems, StoreError>;

    /// The newest order for a (case-normalized) email; several orders may
    /// share an email and only the most recent is returned.
    async fn latest_order_by_email(&self, email: &str) -> Result<OrderWithItems, StoreError>;

    /// All orders with items, newest first (the admin console).
    async fn list_orders(&self) -> Result<Vec<OrderWithItems>, StoreError>;

    /// Last-write-wins status update; any target status is accepted.
    async fn set_order_status(&self, id: OrderId, status: OrderStatus) -> Result<(), StoreError>;
}
