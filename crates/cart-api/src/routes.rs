//! # Routes
//!
//! Axum router configuration for the cart API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET  /                      - List all items
/// - GET  /phone/cart            - One item (`?id=`) or all items
/// - POST /phone/cart            - Add an item to the cart
/// - POST /create-payment-intent - Create a Stripe payment intent
/// - GET  /health                - Health check
pub fn create_router(state: AppState) -> Router {
    // The storefront is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::list_items))
        .route(
            "/phone/cart",
            get(handlers::get_cart).post(handlers::add_to_cart),
        )
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route("/health", get(handlers::health))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
