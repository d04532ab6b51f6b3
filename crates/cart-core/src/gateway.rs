//! # Payment Gateway Trait
//!
//! Seam between the route layer and a third-party payment API.
//! The Stripe PaymentIntents client is the production implementation;
//! tests substitute a recording fake.

use crate::error::PaymentResult;
use crate::payment::{PaymentIntent, PaymentIntentRequest};
use async_trait::async_trait;
use std::sync::Arc;

/// Third-party payment API client
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Create a payment intent and return it, including its client secret.
    async fn create_payment_intent(
        &self,
        request: &PaymentIntentRequest,
    ) -> PaymentResult<PaymentIntent>;

    /// Get the provider name (for logging and health output).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
