//! Core types for the shopper.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod quantity;

pub use cart::CartItem;
pub use id::*;
pub use price::Price;
pub use product::{Catalog, Chair, ChairInfo, Couch, CouchInfo, Product, ProductNotFound};
pub use quantity::{Quantity, QuantityError};
