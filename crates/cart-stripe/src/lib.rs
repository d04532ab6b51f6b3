//! # cart-stripe
//!
//! Stripe payment gateway for phone-cart.
//!
//! `StripePaymentIntents` implements `cart_core::PaymentGateway` on top of
//! the PaymentIntents API: the server creates an intent for the cart total
//! and hands its client secret to the browser, which confirms the card
//! payment with Stripe.js.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_core::{Currency, PaymentGateway, PaymentIntentRequest};
//! use cart_stripe::StripePaymentIntents;
//!
//! // Create gateway from environment (STRIPE_SECRET_KEY)
//! let gateway = StripePaymentIntents::from_env()?;
//!
//! // $10.00, card only
//! let request = PaymentIntentRequest::card(10.00, Currency::USD)?;
//! let intent = gateway.create_payment_intent(&request).await?;
//!
//! // Return intent.client_secret to the frontend
//! ```

pub mod config;
pub mod intents;

// Re-exports
pub use config::StripeConfig;
pub use intents::StripePaymentIntents;
