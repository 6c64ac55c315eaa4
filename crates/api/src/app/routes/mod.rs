use axum::{
    routing::{get, post, put},
    Router,
};

pub mod auth;
pub mod orders;
pub mod products;
pub mod stock;
pub mod storefront;
pub mod system;

/// Router for the unauthenticated storefront surface.
pub fn public_router() -> Router {
    Router::new()
        .route("/auth/sign_in", post(auth::sign_in))
        .route("/store/products", get(storefront::list_products))
        .route("/orders", post(orders::checkout))
        .route("/orders/track", get(orders::track))
}

/// Router for the authenticated admin surface (nested under `/admin`).
pub fn admin_router() -> Router {
    Router::new()
        .route("/session", get(system::session))
        .route("/products", get(products::list_products).post(products::create_product))
        .route(
            "/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/stock", get(stock::overview))
        .route("/orders", get(orders::list_orders))
        .route("/orders/:id/status", post(orders::update_status))
}
