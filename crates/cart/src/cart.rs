use serde::{Deserialize, Serialize};

use stockflow_catalog::Product;
use stockflow_core::{DomainError, DomainResult, ProductId};

/// One cart line: a product snapshot plus the requested quantity.
///
/// The snapshot carries the stock known when the cart was built; quantity
/// checks run against that value, and unit prices are taken from it at
/// checkout (never re-read from the catalog).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub quantity: i64,
}

impl CartItem {
    /// Line subtotal in cents.
    pub fn subtotal_cents(&self) -> u64 {
        self.product.price_cents * self.quantity as u64
    }
}

/// Session-local shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add a product to the cart, merging with an existing line.
    ///
    /// The merged quantity must not exceed the product's known stock.
    pub fn add(&mut self, product: Product, quantity: i64) -> DomainResult<()> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(existing) => {
                let merged = existing.quantity + quantity;
                if merged > product.stock {
                    return Err(insufficient_stock(product.stock));
                }
                existing.quantity = merged;
            }
            None => {
                if quantity > product.stock {
                    return Err(insufficient_stock(product.stock));
                }
                self.items.push(CartItem { product, quantity });
            }
        }

        Ok(())
    }

    /// Set the quantity of an existing line. Zero removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> DomainResult<()> {
        if quantity < 0 {
            return Err(DomainError::validation("quantity cannot be negative"));
        }
        if quantity == 0 {
            self.remove(product_id);
            return Ok(());
        }

        let item = self
            .items
            .iter_mut()
            .find(|i| i.product.id == product_id)
            .ok_or(DomainError::NotFound)?;

        if quantity > item.product.stock {
            return Err(insufficient_stock(item.product.stock));
        }
        item.quantity = quantity;
        Ok(())
    }

    pub fn remove(&mut self, product_id: ProductId) {
        self.items.retain(|i| i.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total item count across all lines.
    pub fn total_items(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Cart total in cents, from the snapshot prices.
    pub fn total_cents(&self) -> u64 {
        self.items.iter().map(CartItem::subtotal_cents).sum()
    }
}

fn insufficient_stock(available: i64) -> DomainError {
    DomainError::validation(format!("insufficient stock: only {available} available"))
}
