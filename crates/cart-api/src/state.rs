//! # Application State
//!
//! Shared state for the Axum application: the cart store handle, the
//! payment gateway client and configuration. Both handles are built once
//! at startup and cloned (by `Arc`) into every request.

use crate::config::AppConfig;
use cart_core::{BoxedCartStore, BoxedPaymentGateway};
use cart_mongo::MongoCartStore;
use cart_stripe::StripePaymentIntents;
use std::sync::Arc;
use tracing::{info, warn};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Cart item store
    pub store: BoxedCartStore,
    /// Payment intent gateway
    pub payments: BoxedPaymentGateway,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Build the production state: Stripe gateway plus a verified MongoDB
    /// connection. Any failure here aborts startup.
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let payments = StripePaymentIntents::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        if payments.config().is_test_mode() {
            info!("Stripe gateway in test mode");
        } else if config.is_production() {
            info!("Stripe gateway in live mode");
        } else {
            warn!("Stripe gateway in live mode outside production");
        }

        let store = MongoCartStore::connect(&config.store)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to MongoDB: {}", e))?;

        Ok(Self::with_backends(
            config,
            Arc::new(store) as BoxedCartStore,
            Arc::new(payments) as BoxedPaymentGateway,
        ))
    }

    /// Assemble state from already-constructed backends
    pub fn with_backends(
        config: AppConfig,
        store: BoxedCartStore,
        payments: BoxedPaymentGateway,
    ) -> Self {
        Self {
            store,
            payments,
            config,
        }
    }
}
