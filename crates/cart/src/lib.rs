//! Shopping cart domain module.
//!
//! The cart is ephemeral, session-local state: a list of (product snapshot,
//! quantity) pairs not yet persisted as an order. It is an explicitly owned
//! state object with read/write methods, created empty and cleared on
//! successful checkout. No IO happens here; all rejections are validation
//! errors raised before any backend call.

pub mod cart;

pub use cart::{Cart, CartItem};
