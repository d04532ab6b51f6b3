//! # Phone Cart
//!
//! Cart and payment backend for the phone storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export MONGODB_URI=mongodb://localhost:27017
//! export STRIPE_SECRET_KEY=sk_test_...
//! export PORT=5000
//!
//! # Run the server
//! phone-cart
//! ```

use cart_api::{routes, AppConfig, AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let config = AppConfig::load()?;
    config.log_startup();

    // Connect before binding so a dead store never leaves a listening,
    // route-less server behind.
    let state = AppState::new(config).await?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Cart store: {}", state.store.backend_name());
    info!("Payment provider: {}", state.payments.provider_name());

    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("🚀 Server is running on http://{}", addr);

    if !is_prod {
        info!("🛒 Cart: GET/POST http://{}/phone/cart", addr);
        info!("💳 Payments: POST http://{}/create-payment-intent", addr);
    }

    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  📱 Phone Cart
  ━━━━━━━━━━━━━━━━━━━━━━━
  Version: {}
"#,
        env!("CARGO_PKG_VERSION")
    );
}
