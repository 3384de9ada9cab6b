//! Product catalog sources.
//!
//! The catalog is a static JSON document with a top-level `products` array.
//! It is decoded once and then served from a `moka` cache until the TTL runs
//! out. Failed loads are not cached, so the next call retries.

use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use shopper_core::Catalog;
use thiserror::Error;
use tracing::{debug, info, instrument};

/// Catalog compiled into the binary.
const BUNDLED_CATALOG: &str = include_str!("../../assets/products.json");

/// Longest time a loaded catalog is reused. Longer TTLs are clamped.
pub const MAX_CATALOG_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Errors that can occur while loading the catalog.
///
/// `Clone` so a failure can be shared by every caller waiting on the same
/// cache entry.
#[derive(Debug, Clone, Error)]
pub enum CatalogError {
    /// The catalog document could not be read.
    #[error("catalog read error: {0}")]
    Io(String),

    /// The catalog document is malformed (bad JSON, unknown product type).
    #[error("catalog parse error: {0}")]
    Parse(String),
}

/// Source of the full product catalog.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Load the full catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or decoded.
    async fn load_catalog(&self) -> Result<Arc<Catalog>, CatalogError>;
}

// =============================================================================
// Cache
// =============================================================================

/// Cache key for decoded catalogs.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
enum CacheKey {
    Bundled,
    File(PathBuf),
}

/// Decoded catalog cache shared by the source implementations.
#[derive(Clone)]
struct CatalogCache {
    cache: Cache<CacheKey, Arc<Catalog>>,
}

impl CatalogCache {
    fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(4)
            .time_to_live(ttl.min(MAX_CATALOG_TTL))
            .build();
        Self { cache }
    }

    async fn get_or_load<F>(&self, key: CacheKey, load: F) -> Result<Arc<Catalog>, CatalogError>
    where
        F: Future<Output = Result<Catalog, CatalogError>> + Send,
    {
        if let Some(catalog) = self.cache.get(&key).await {
            debug!(?key, "Cache hit for catalog");
            return Ok(catalog);
        }

        self.cache
            .try_get_with(key, async move { load.await.map(Arc::new) })
            .await
            .map_err(Arc::unwrap_or_clone)
    }
}

fn decode(json: &str) -> Result<Catalog, CatalogError> {
    let catalog = Catalog::from_json(json).map_err(|e| CatalogError::Parse(e.to_string()))?;
    info!(products = catalog.products.len(), "Catalog decoded");
    Ok(catalog)
}

// =============================================================================
// BundledProductSource
// =============================================================================

/// Catalog shipped inside the binary.
#[derive(Clone)]
pub struct BundledProductSource {
    document: Cow<'static, str>,
    cache: CatalogCache,
}

impl BundledProductSource {
    /// Serve the catalog bundled with the application.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            document: Cow::Borrowed(BUNDLED_CATALOG),
            cache: CatalogCache::new(ttl),
        }
    }

    /// Serve an in-memory catalog document instead of the bundled one.
    #[must_use]
    pub fn with_document(document: impl Into<String>, ttl: Duration) -> Self {
        Self {
            document: Cow::Owned(document.into()),
            cache: CatalogCache::new(ttl),
        }
    }
}

#[async_trait]
impl ProductSource for BundledProductSource {
    #[instrument(skip(self))]
    async fn load_catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        let document = &self.document;
        self.cache
            .get_or_load(CacheKey::Bundled, async move { decode(document) })
            .await
    }
}

// =============================================================================
// FileProductSource
// =============================================================================

/// Catalog read from a JSON file.
#[derive(Clone)]
pub struct FileProductSource {
    path: PathBuf,
    cache: CatalogCache,
}

impl FileProductSource {
    /// Serve the catalog stored at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            path: path.into(),
            cache: CatalogCache::new(ttl),
        }
    }

    /// Path of the catalog file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl ProductSource for FileProductSource {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load_catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        let path = self.path.clone();
        self.cache
            .get_or_load(CacheKey::File(path.clone()), async move {
                let json = tokio::fs::read_to_string(&path)
                    .await
                    .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
                decode(&json)
            })
            .await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use shopper_core::{Product, ProductId};

    const TTL: Duration = Duration::from_secs(60);

    const ONE_CHAIR: &str = r#"{"products": [{
        "id": 1, "name": "Henriksdal", "price": {"value": 499.0, "currency": "kr"},
        "type": "chair", "imageUrl": "", "info": {"material": "wood", "color": "black"}
    }]}"#;

    #[tokio::test]
    async fn test_bundled_catalog_decodes() {
        let source = BundledProductSource::new(TTL);
        let catalog = source.load_catalog().await.unwrap();
        assert!(!catalog.products.is_empty());
        assert!(catalog
            .products
            .iter()
            .any(|product| matches!(product, Product::Chair(_))));
        assert!(catalog
            .products
            .iter()
            .any(|product| matches!(product, Product::Couch(_))));
    }

    #[tokio::test]
    async fn test_malformed_document_is_parse_error() {
        let source = BundledProductSource::with_document("{\"products\": [", TTL);
        let err = source.load_catalog().await.unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileProductSource::new(dir.path().join("missing.json"), TTL);
        let err = source.load_catalog().await.unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[tokio::test]
    async fn test_oversized_ttl_is_clamped() {
        let source = BundledProductSource::with_document(ONE_CHAIR, Duration::MAX);
        let catalog = source.load_catalog().await.unwrap();
        assert_eq!(catalog.products[0].id(), ProductId::new(1));
    }

    #[tokio::test]
    async fn test_file_catalog_is_cached() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, ONE_CHAIR).unwrap();

        let source = FileProductSource::new(&path, TTL);
        let first = source.load_catalog().await.unwrap();
        assert_eq!(first.find(ProductId::new(1)).unwrap().name(), "Henriksdal");

        // Served from cache even though the file is now unreadable as a catalog
        std::fs::write(&path, "not json").unwrap();
        let second = source.load_catalog().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_failed_load_is_retried() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("products.json");
        std::fs::write(&path, "not json").unwrap();

        let source = FileProductSource::new(&path, TTL);
        assert!(source.load_catalog().await.is_err());

        std::fs::write(&path, ONE_CHAIR).unwrap();
        let catalog = source.load_catalog().await.unwrap();
        assert_eq!(catalog.products.len(), 1);
    }
}
