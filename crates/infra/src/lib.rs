//! `stockflow-infra` — the data-backend boundary and the order placement flow.
//!
//! The domain crates stay pure; everything that talks to the remote store
//! lives here: the [`Backend`](backend::Backend) trait over the logical
//! `products` / `orders` / `order_items` tables, an in-memory backend for
//! dev/tests, a Postgres backend, and the staged order placement sequence.

pub mod backend;
pub mod memory;
pub mod placement;
pub mod postgres;

pub use backend::{Backend, StoreError};
pub use memory::InMemoryBackend;
pub use placement::{place_order, OrderConfirmation, PlacementError, PlacementStage};
pub use postgres::PostgresBackend;
