//! Application-level error type.
//!
//! Module errors (`CatalogError`, `StorageError`, `ConfigError`) stay with the
//! code that raises them. `AppError` only wraps the failures that can stop
//! the composition root from starting.

use thiserror::Error;

use crate::config::ConfigError;
use crate::data::StorageError;

/// Application-level error type for the shopper.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// The cart store could not be read.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
