//! StockFlow HTTP API (Axum).
//!
//! Public storefront routes (catalog, checkout, order tracking) plus a
//! bearer-token-protected `/admin` surface for catalog and order management.

pub mod app;
pub mod context;
pub mod middleware;
