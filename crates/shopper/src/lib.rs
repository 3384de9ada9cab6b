//! Shopper: catalog, cart and screen state for a furniture store.
//!
//! # Layers
//!
//! - [`data`] - catalog sources, the cart key-value store, and the two
//!   repositories built on them
//! - [`domain`] - use cases the screens call
//! - [`ui`] - per-screen state containers publishing serializable snapshots
//! - [`app`] - composition root wiring everything from [`config`]

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod app;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod ui;

pub use app::ShopperApp;
pub use config::ShopperConfig;
