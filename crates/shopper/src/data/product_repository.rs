//! Product queries over the catalog.

use std::sync::Arc;

use async_trait::async_trait;
use shopper_core::{Product, ProductId, ProductNotFound};
use tracing::{debug, instrument, warn};

use super::product_source::{CatalogError, ProductSource};

/// Read access to the product catalog.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// List catalog products, optionally filtered by a search query.
    ///
    /// A present, non-empty query keeps the products whose `"{name} {type}"`
    /// contains it, ignoring case. The query is used as given, whitespace
    /// included. No match is an empty list, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the catalog cannot be loaded.
    async fn list_products(&self, query: Option<&str>) -> Result<Vec<Product>, CatalogError>;

    /// Fetch one product by id.
    ///
    /// # Errors
    ///
    /// Returns `ProductNotFound` if no product has that id, or if the catalog
    /// cannot be loaded.
    async fn get_product(&self, id: ProductId) -> Result<Product, ProductNotFound>;
}

/// Product repository reading through a [`ProductSource`].
#[derive(Clone)]
pub struct CatalogProductRepository {
    source: Arc<dyn ProductSource>,
}

impl CatalogProductRepository {
    /// Create a repository over `source`.
    #[must_use]
    pub fn new(source: Arc<dyn ProductSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl ProductRepository for CatalogProductRepository {
    #[instrument(skip(self))]
    async fn list_products(&self, query: Option<&str>) -> Result<Vec<Product>, CatalogError> {
        let catalog = self.source.load_catalog().await?;

        let needle = query.filter(|q| !q.is_empty()).map(str::to_lowercase);

        let products: Vec<Product> = match needle {
            Some(needle) => catalog
                .products
                .iter()
                .filter(|product| product.matches_query(&needle))
                .cloned()
                .collect(),
            None => catalog.products.clone(),
        };

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: ProductId) -> Result<Product, ProductNotFound> {
        let products = self.list_products(None).await.map_err(|e| {
            warn!(error = %e, "Catalog unavailable for product lookup");
            ProductNotFound
        })?;

        products
            .into_iter()
            .find(|product| product.id() == id)
            .ok_or(ProductNotFound)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::data::BundledProductSource;
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(60);

    const CATALOG: &str = r#"{"products": [
        {
            "id": 1, "name": "Henriksdal", "price": {"value": 499.0, "currency": "kr"},
            "type": "chair", "imageUrl": "", "info": {"material": "wood", "color": "black"}
        },
        {
            "id": 2, "name": "Lidhult", "price": {"value": 1035.0, "currency": "kr"},
            "type": "couch", "imageUrl": "", "info": {"numberOfSeats": 4, "color": "beige"}
        },
        {
            "id": 3, "name": "Ingolf", "price": {"value": 745.0, "currency": "kr"},
            "type": "chair", "imageUrl": "", "info": {"material": "pine", "color": "white"}
        }
    ]}"#;

    fn repository(document: &str) -> CatalogProductRepository {
        CatalogProductRepository::new(Arc::new(BundledProductSource::with_document(
            document, TTL,
        )))
    }

    fn ids(products: &[Product]) -> Vec<i32> {
        products.iter().map(|p| p.id().as_i32()).collect()
    }

    #[tokio::test]
    async fn test_list_without_query_returns_catalog() {
        let products = repository(CATALOG).list_products(None).await.unwrap();
        assert_eq!(ids(&products), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_empty_query_returns_catalog() {
        let products = repository(CATALOG).list_products(Some("")).await.unwrap();
        assert_eq!(products.len(), 3);
    }

    #[tokio::test]
    async fn test_query_whitespace_is_kept() {
        let products = repository(CATALOG)
            .list_products(Some(" henrik"))
            .await
            .unwrap();
        assert!(products.is_empty());

        let products = repository(CATALOG).list_products(Some("  ")).await.unwrap();
        assert!(products.is_empty());

        // "{name} {type}" has a single inner space
        let products = repository(CATALOG)
            .list_products(Some("lidhult couch"))
            .await
            .unwrap();
        assert_eq!(ids(&products), vec![2]);
    }

    #[tokio::test]
    async fn test_query_is_case_insensitive() {
        let products = repository(CATALOG)
            .list_products(Some("henrik"))
            .await
            .unwrap();
        assert_eq!(ids(&products), vec![1]);

        let products = repository(CATALOG)
            .list_products(Some("HENRIKSDAL"))
            .await
            .unwrap();
        assert_eq!(ids(&products), vec![1]);
    }

    #[tokio::test]
    async fn test_query_matches_type() {
        let products = repository(CATALOG)
            .list_products(Some("Chair"))
            .await
            .unwrap();
        assert_eq!(ids(&products), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_query_without_match_is_empty_success() {
        let products = repository(CATALOG)
            .list_products(Some("wardrobe"))
            .await
            .unwrap();
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_catalog_fails_listing() {
        let result = repository("{\"products\": 3}").list_products(None).await;
        assert!(matches!(result, Err(CatalogError::Parse(_))));
    }

    #[tokio::test]
    async fn test_get_product_by_id() {
        let product = repository(CATALOG)
            .get_product(ProductId::new(2))
            .await
            .unwrap();
        assert_eq!(product.name(), "Lidhult");
    }

    #[tokio::test]
    async fn test_get_missing_product_fails() {
        let result = repository(CATALOG).get_product(ProductId::new(99)).await;
        assert_eq!(result, Err(ProductNotFound));
    }

    #[tokio::test]
    async fn test_get_product_when_catalog_broken_fails() {
        let result = repository("not json").get_product(ProductId::new(1)).await;
        assert_eq!(result, Err(ProductNotFound));
    }
}
