//! # cart-core
//!
//! Core types and traits for the phone-cart backend.
//!
//! This crate provides:
//! - `Item`, `ItemId` and `CartItem` for cart records
//! - `CartStore` trait for document store backends, plus `MemoryCartStore`
//! - `PaymentGateway` trait for payment providers
//! - `Currency` and `PaymentIntentRequest` for payment intents
//! - `CartError` and `PaymentError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{CartStore, Currency, Item, PaymentIntentRequest};
//!
//! // Add an item to the cart
//! let item_id = store.insert_item(Item::new("Phone A", 2, 199.99)).await?;
//!
//! // Charge $10.00 by card
//! let request = PaymentIntentRequest::card(10.00, Currency::USD)?;
//! let intent = gateway.create_payment_intent(&request).await?;
//!
//! // Hand intent.client_secret to the browser
//! ```

pub mod error;
pub mod gateway;
pub mod item;
pub mod payment;
pub mod store;

// Re-exports for convenience
pub use error::{CartError, CartResult, PaymentError, PaymentResult};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use item::{CartItem, Item, ItemId};
pub use payment::{Currency, PaymentIntent, PaymentIntentRequest};
pub use store::{BoxedCartStore, CartStore, MemoryCartStore};
