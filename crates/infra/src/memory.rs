//! In-memory backend for tests and development.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use stockflow_catalog::{NewProduct, Product, ProductPatch};
use stockflow_core::{OrderId, ProductId};
use stockflow_orders::{
    Order, OrderDraft, OrderItem, OrderItemDetail, OrderStatus, OrderWithItems,
};

use crate::backend::{Backend, StoreError};

/// In-memory store keyed like the real tables.
///
/// Each trait method takes a lock once and releases it before returning, so
/// the multi-call placement sequence interleaves with concurrent callers the
/// same way the remote store does.
#[derive(Debug, Default)]
pub struct InMemoryBackend {
    products: RwLock<HashMap<ProductId, Product>>,
    orders: RwLock<HashMap<OrderId, Order>>,
    order_items: RwLock<Vec<OrderItem>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn items_for(&self, order_id: OrderId) -> Result<Vec<OrderItemDetail>, StoreError> {
        let items = self.order_items.read().map_err(poisoned)?;
        let products = self.products.read().map_err(poisoned)?;

        Ok(items
            .iter()
            .filter(|i| i.order_id == order_id)
            .map(|i| OrderItemDetail {
                product_id: i.product_id,
                product_name: products
                    .get(&i.product_id)
                    .map(|p| p.name.clone())
                    .unwrap_or_default(),
                quantity: i.quantity,
                unit_price_cents: i.unit_price_cents,
            })
            .collect())
    }

    fn with_items(&self, order: Order) -> Result<OrderWithItems, StoreError> {
        let items = self.items_for(order.id)?;
        Ok(OrderWithItems { order, items })
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

fn newest_first(products: &mut [Product]) {
    products.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        let mut all: Vec<Product> = products.values().cloned().collect();
        newest_first(&mut all);
        Ok(all)
    }

    async fn list_in_stock_products(&self) -> Result<Vec<Product>, StoreError> {
        let mut available = self.list_products().await?;
        available.retain(|p| p.stock > 0);
        Ok(available)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, StoreError> {
        let products = self.products.read().map_err(poisoned)?;
        products.get(&id).cloned().ok_or(StoreError::NotFound)
    }

    async fn create_product(&self, draft: NewProduct) -> Result<Product, StoreError> {
        let product = Product {
            id: ProductId::new(),
            name: draft.name,
            description: draft.description,
            price_cents: draft.price_cents,
            stock: draft.stock,
            image_url: draft.image_url,
            created_at: Utc::now(),
        };
        let mut products = self.products.write().map_err(poisoned)?;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<Product, StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        let product = products.get_mut(&id).ok_or(StoreError::NotFound)?;
        patch.apply_to(product);
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        products.remove(&id).map(|_| ()).ok_or(StoreError::NotFound)
    }

    async fn decrement_stock(&self, id: ProductId, quantity: i64) -> Result<(), StoreError> {
        let mut products = self.products.write().map_err(poisoned)?;
        let product = products.get_mut(&id).ok_or(StoreError::NotFound)?;
        if product.stock < quantity {
            return Err(StoreError::InsufficientStock {
                product_id: id,
                requested: quantity,
                available: product.stock,
            });
        }
        product.stock -= quantity;
        Ok(())
    }

    async fn insert_order(&self, draft: OrderDraft) -> Result<Order, StoreError> {
        let order = Order {
            id: OrderId::new(),
            customer_name: draft.customer_name,
            customer_email: draft.customer_email,
            status: OrderStatus::Pending,
            total_cents: draft.total_cents,
            created_at: Utc::now(),
        };
        let mut orders = self.orders.write().map_err(poisoned)?;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn insert_order_items(&self, items: &[OrderItem]) -> Result<(), StoreError> {
        let mut stored = self.order_items.write().map_err(poisoned)?;
        stored.extend_from_slice(items);
        Ok(())
    }

    async fn order_by_id(&self, id: OrderId) -> Result<OrderWithItems, StoreError> {
        let order = {
            let orders = self.orders.read().map_err(poisoned)?;
            orders.get(&id).cloned().ok_or(StoreError::NotFound)?
        };
        self.with_items(order)
    }

    async fn latest_order_by_email(&self, email: &str) -> Result<OrderWithItems, StoreError> {
        let order = {
            let orders = self.orders.read().map_err(poisoned)?;
            orders
                .values()
                .filter(|o| o.customer_email == email)
                .max_by(|a, b| {
                    a.created_at
                        .cmp(&b.created_at)
                        .then(a.id.as_uuid().cmp(b.id.as_uuid()))
                })
                .cloned()
                .ok_or(StoreError::NotFound)?
        };
        self.with_items(order)
    }

    async fn list_orders(&self) -> Result<Vec<OrderWithItems>, StoreError> {
        let mut all: Vec<Order> = {
            let orders = self.orders.read().map_err(poisoned)?;
            orders.values().cloned().collect()
        };
        all.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.as_uuid().cmp(a.id.as_uuid()))
        });
        all.into_iter().map(|o| self.with_items(o)).collect()
    }

    async fn set_order_status(&self, id: OrderId, status: OrderStatus) -> Result<(), StoreError> {
        let mut orders = self.orders.write().map_err(poisoned)?;
        let order = orders.get_mut(&id).ok_or(StoreError::NotFound)?;
        order.status = status;
        Ok(())
    }
}
