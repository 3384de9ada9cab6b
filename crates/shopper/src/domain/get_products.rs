//! List catalog products.

use std::sync::Arc;

use shopper_core::Product;

use crate::data::{CatalogError, ProductRepository};

/// Lists products, optionally filtered by a search query.
#[derive(Clone)]
pub struct GetProducts {
    products: Arc<dyn ProductRepository>,
}

impl GetProducts {
    #[must_use]
    pub fn new(products: Arc<dyn ProductRepository>) -> Self {
        Self { products }
    }

    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    pub async fn execute(&self, query: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        self.products.list_products(query).await
    }
}
