//! Shopper Core - model types for the furniture catalog and cart.
//!
//! This crate provides the types shared by every layer of the shopper:
//! - the product catalog (`Product`, with `Chair` and `Couch` variants)
//! - the cart (`CartItem`, `Quantity`)
//! - money (`Price`)
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no async
//! runtime. Loading and persisting live in the `shopper` crate.
//!
//! # Modules
//!
//! - [`types`] - Product model, identifiers, quantities and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
