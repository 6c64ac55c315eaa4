//! Product catalog domain module.
//!
//! This crate contains the product record plus the stock classification
//! engine, implemented purely as deterministic domain logic (no IO, no HTTP,
//! no storage).

pub mod product;
pub mod stock;

pub use product::{NewProduct, Product, ProductPatch};
pub use stock::{
    aggregate, alert_list, classify, max_purchasable, StockStats, StockTier,
    LOW_STOCK_THRESHOLD, PER_LINE_PURCHASE_CAP,
};
