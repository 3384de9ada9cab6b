//! Composition root.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{CatalogLocation, ShopperConfig};
use crate::data::{
    BundledProductSource, CartRepository, CartStore, CatalogProductRepository, FileCartStore,
    FileProductSource, ProductRepository, ProductSource,
};
use crate::domain::{AddToCart, GetCartItemCount, GetProducts};
use crate::error::Result;
use crate::ui::{CartViewModel, HomeViewModel, ProductViewModel};

/// Wired-up application.
///
/// This struct is cheaply cloneable via `Arc`. Screen containers are created
/// on demand and all share the same repositories.
#[derive(Clone)]
pub struct ShopperApp {
    inner: Arc<ShopperAppInner>,
}

struct ShopperAppInner {
    products: Arc<dyn ProductRepository>,
    cart: CartRepository,
    load_delay: Duration,
}

impl ShopperApp {
    /// Build the application from configuration.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart store location cannot be prepared.
    pub fn from_config(config: &ShopperConfig) -> Result<Self> {
        let source: Arc<dyn ProductSource> = match &config.catalog {
            CatalogLocation::Bundled => Arc::new(BundledProductSource::new(config.catalog_cache_ttl)),
            CatalogLocation::File(path) => {
                Arc::new(FileProductSource::new(path.clone(), config.catalog_cache_ttl))
            }
        };
        let store = FileCartStore::open(&config.cart_path)?;

        info!(
            catalog = ?config.catalog,
            cart_path = %config.cart_path.display(),
            "Building shopper"
        );

        Ok(Self::from_parts(
            Arc::new(CatalogProductRepository::new(source)),
            Arc::new(store),
            config.load_delay,
        ))
    }

    /// Build the application from explicit parts.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn from_parts(
        products: Arc<dyn ProductRepository>,
        store: Arc<dyn CartStore>,
        load_delay: Duration,
    ) -> Self {
        let cart = CartRepository::new(store, Arc::clone(&products));
        Self {
            inner: Arc::new(ShopperAppInner {
                products,
                cart,
                load_delay,
            }),
        }
    }

    /// Get a reference to the product repository.
    #[must_use]
    pub fn products(&self) -> &Arc<dyn ProductRepository> {
        &self.inner.products
    }

    /// Get a reference to the cart repository.
    #[must_use]
    pub fn cart(&self) -> &CartRepository {
        &self.inner.cart
    }

    /// Create a product list screen container.
    #[must_use]
    pub fn home(&self) -> HomeViewModel {
        HomeViewModel::new(
            GetProducts::new(Arc::clone(&self.inner.products)),
            AddToCart::new(self.inner.cart.clone()),
            &GetCartItemCount::new(self.inner.cart.clone()),
            self.inner.load_delay,
        )
    }

    /// Create a product detail screen container.
    #[must_use]
    pub fn product(&self) -> ProductViewModel {
        ProductViewModel::new(
            Arc::clone(&self.inner.products),
            AddToCart::new(self.inner.cart.clone()),
            &GetCartItemCount::new(self.inner.cart.clone()),
        )
    }

    /// Create a cart screen container.
    #[must_use]
    pub fn cart_screen(&self) -> CartViewModel {
        CartViewModel::new(self.inner.cart.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopper_core::ProductId;

    #[tokio::test]
    async fn test_from_config_uses_bundled_catalog_and_file_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShopperConfig {
            cart_path: dir.path().join("cart.json"),
            ..ShopperConfig::default()
        };
        let app = ShopperApp::from_config(&config).unwrap();

        let products = app.products().list_products(None).await.unwrap();
        assert_eq!(products.len(), 8);

        app.cart().add_to_cart(ProductId::new(3)).unwrap();
        assert!(config.cart_path.exists());
    }

    #[tokio::test]
    async fn test_screens_share_one_cart() {
        let dir = tempfile::tempdir().unwrap();
        let config = ShopperConfig {
            cart_path: dir.path().join("cart.json"),
            ..ShopperConfig::default()
        };
        let app = ShopperApp::from_config(&config).unwrap();
        let home = app.home();
        let cart = app.cart_screen();

        home.add_product_to_cart(ProductId::new(2));

        let mut rx = cart.subscribe();
        let state = rx.wait_for(|s| s.items.len() == 1).await.unwrap().clone();
        assert_eq!(state.items[0].product.as_ref().unwrap().name(), "Lidhult");
    }
}
