//! Shopper command-line driver.
//!
//! Loads the catalog (optionally filtered by the first argument), restores
//! the persisted cart and logs a summary of both.

#![cfg_attr(not(test), forbid(unsafe_code))]

use shopper::error::Result;
use shopper::ui::HomeState;
use shopper::{ShopperApp, ShopperConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "shopper=info,shopper_core=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ShopperConfig::from_env()?;
    let app = ShopperApp::from_config(&config)?;

    let query = std::env::args().nth(1);
    let home = app.home();
    home.get_products(query.as_deref());

    let mut rx = home.subscribe();
    let loaded = rx.wait_for(|state| !state.is_loading).await;
    let Ok(state) = loaded.map(|s| HomeState::clone(&s)) else {
        tracing::error!("Product list closed before loading finished");
        return Ok(());
    };

    if let Some(message) = state.message {
        tracing::warn!(%message, "Product list unavailable");
    }
    for product in &state.products {
        tracing::info!(
            id = %product.id(),
            kind = product.product_type(),
            price = %product.price(),
            "{}",
            product.name()
        );
    }
    tracing::info!(
        count = state.products.len(),
        query = state.search_query.as_deref().unwrap_or(""),
        "Catalog loaded"
    );

    let cart = app.cart();
    for (id, quantity) in cart.quantities() {
        tracing::info!(product_id = %id, %quantity, "Cart line");
    }
    tracing::info!(items = cart.item_count(), "Cart restored");

    if let Ok(json) = serde_json::to_string(&state) {
        tracing::debug!(state = %json, "Home snapshot");
    }

    Ok(())
}
