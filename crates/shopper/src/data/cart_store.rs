//! Cart key-value storage.
//!
//! The cart is persisted as a flat set of `"<product id>" → quantity` pairs.
//! Every save replaces the entire stored set. Storage calls are synchronous:
//! a cart mutation is not complete until the store has been written.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use indexmap::IndexMap;
use shopper_core::{ProductId, Quantity};
use thiserror::Error;
use tracing::{debug, warn};

/// Product id → quantity, in insertion order.
pub type CartQuantities = IndexMap<ProductId, Quantity>;

/// Errors that can occur while reading or writing the cart store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("cart store I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stored document is not a JSON object of integers.
    #[error("cart store encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Persistent key-value storage for cart quantities.
pub trait CartStore: Send + Sync {
    /// Replace the stored set with `cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the set cannot be written.
    fn save(&self, cart: &CartQuantities) -> Result<(), StorageError>;

    /// Load the stored set.
    ///
    /// # Errors
    ///
    /// Returns an error if the store exists but cannot be read.
    fn load(&self) -> Result<CartQuantities, StorageError>;
}

/// Decode raw key-value pairs, skipping entries that cannot form a cart line.
fn decode_entries(raw: IndexMap<String, i64>) -> CartQuantities {
    raw.into_iter()
        .filter_map(|(key, value)| {
            let Ok(id) = key.parse::<ProductId>() else {
                warn!(key = %key, "Skipping cart entry with non-numeric key");
                return None;
            };
            match Quantity::try_from(value) {
                Ok(quantity) => Some((id, quantity)),
                Err(e) => {
                    warn!(product_id = %id, error = %e, "Skipping cart entry");
                    None
                }
            }
        })
        .collect()
}

fn encode_entries(cart: &CartQuantities) -> IndexMap<String, i64> {
    cart.iter()
        .map(|(id, quantity)| (id.to_string(), i64::from(quantity.get())))
        .collect()
}

// =============================================================================
// FileCartStore
// =============================================================================

/// Cart store backed by a JSON object file.
#[derive(Debug, Clone)]
pub struct FileCartStore {
    path: PathBuf,
}

impl FileCartStore {
    /// Open a store at `path`, creating parent directories as needed.
    ///
    /// The file itself is created on first save.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be created.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        Ok(Self { path })
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStore for FileCartStore {
    fn save(&self, cart: &CartQuantities) -> Result<(), StorageError> {
        let json = serde_json::to_vec_pretty(&encode_entries(cart))?;

        // Write the whole set next to the target, then swap it in
        let tmp = self.path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), lines = cart.len(), "Cart saved");
        Ok(())
    }

    fn load(&self) -> Result<CartQuantities, StorageError> {
        let json = match std::fs::read(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(CartQuantities::new()),
            Err(e) => return Err(e.into()),
        };
        let raw: IndexMap<String, i64> = serde_json::from_slice(&json)?;
        Ok(decode_entries(raw))
    }
}

// =============================================================================
// MemoryCartStore
// =============================================================================

/// Cart store kept in memory, for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryCartStore {
    entries: Mutex<IndexMap<String, i64>>,
}

impl MemoryCartStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `cart`.
    #[must_use]
    pub fn with_cart(cart: &CartQuantities) -> Self {
        Self {
            entries: Mutex::new(encode_entries(cart)),
        }
    }

    /// Raw stored key-value pairs.
    #[must_use]
    pub fn entries(&self) -> IndexMap<String, i64> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CartStore for MemoryCartStore {
    fn save(&self, cart: &CartQuantities) -> Result<(), StorageError> {
        *self.entries.lock().unwrap_or_else(PoisonError::into_inner) = encode_entries(cart);
        Ok(())
    }

    fn load(&self) -> Result<CartQuantities, StorageError> {
        Ok(decode_entries(self.entries()))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn cart(entries: &[(i32, i64)]) -> CartQuantities {
        entries
            .iter()
            .map(|&(id, quantity)| (ProductId::new(id), Quantity::try_from(quantity).unwrap()))
            .collect()
    }

    #[test]
    fn test_file_store_missing_file_is_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCartStore::open(dir.path().join("cart.json")).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_writes_string_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCartStore::open(dir.path().join("cart.json")).unwrap();
        store.save(&cart(&[(3, 2), (1, 5)])).unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&std::fs::read(store.path()).unwrap()).unwrap();
        assert_eq!(raw, serde_json::json!({"3": 2, "1": 5}));

        let loaded = store.load().unwrap();
        let ids: Vec<i32> = loaded.keys().map(ProductId::as_i32).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_file_store_save_replaces_whole_set() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCartStore::open(dir.path().join("cart.json")).unwrap();
        store.save(&cart(&[(1, 1), (2, 1)])).unwrap();
        store.save(&cart(&[(2, 4)])).unwrap();
        assert_eq!(store.load().unwrap(), cart(&[(2, 4)]));

        store.save(&CartQuantities::new()).unwrap();
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_store_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileCartStore::open(dir.path().join("nested/deeper/cart.json")).unwrap();
        store.save(&cart(&[(1, 1)])).unwrap();
        assert_eq!(store.load().unwrap().len(), 1);
    }

    #[test]
    fn test_file_store_corrupt_document_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, "[1, 2").unwrap();
        let store = FileCartStore::open(&path).unwrap();
        assert!(matches!(store.load(), Err(StorageError::Encoding(_))));
    }

    #[test]
    fn test_invalid_entries_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, r#"{"1": 2, "chair": 1, "4": 0, "5": -2, "6": 1}"#).unwrap();
        let store = FileCartStore::open(&path).unwrap();
        assert_eq!(store.load().unwrap(), cart(&[(1, 2), (6, 1)]));
    }

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryCartStore::with_cart(&cart(&[(7, 3)]));
        assert_eq!(store.load().unwrap(), cart(&[(7, 3)]));

        store.save(&cart(&[(8, 1)])).unwrap();
        let entries = store.entries();
        assert_eq!(entries.get("8"), Some(&1));
        assert_eq!(entries.len(), 1);
    }
}
