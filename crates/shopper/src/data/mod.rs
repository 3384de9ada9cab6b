//! Data layer: sources, stores and repositories.
//!
//! # Architecture
//!
//! - [`ProductSource`] reads the catalog document (bundled or from a file) and
//!   caches the decoded catalog via `moka`
//! - [`CartStore`] persists the cart as a flat id → quantity key-value set
//! - [`ProductRepository`] filters the catalog and looks products up by id
//! - [`CartRepository`] owns the cart state and publishes it over a `watch`
//!   channel
//!
//! Everything above this layer talks to the repositories, never to sources
//! or stores directly.

mod cart_repository;
mod cart_store;
mod product_repository;
mod product_source;

pub use cart_repository::CartRepository;
pub use cart_store::{CartQuantities, CartStore, FileCartStore, MemoryCartStore, StorageError};
pub use product_repository::{CatalogProductRepository, ProductRepository};
pub use product_source::{
    BundledProductSource, CatalogError, FileProductSource, MAX_CATALOG_TTL, ProductSource,
};
