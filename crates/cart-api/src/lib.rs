//! # cart-api
//!
//! HTTP API layer for phone-cart.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Cart endpoints backed by the document store
//! - Payment intent creation via Stripe
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | List all items |
//! | GET | `/phone/cart?id=` | Get one item, or all items without `id` |
//! | POST | `/phone/cart` | Add item to cart |
//! | POST | `/create-payment-intent` | Create payment intent |
//! | GET | `/health` | Health check |

pub mod config;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use routes::create_router;
pub use state::AppState;
