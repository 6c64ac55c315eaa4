//! Orders domain module.
//!
//! This crate contains the order and order-item records, customer identity
//! validation, and the order status lifecycle, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod order;
pub mod status;

pub use order::{CustomerDetails, Order, OrderDraft, OrderItem, OrderItemDetail, OrderWithItems};
pub use status::{timeline, OrderStatus, TimelineStep};
