//! Shopper configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `SHOPPER_CATALOG_PATH` - Catalog JSON file to read instead of the bundled one
//! - `SHOPPER_CART_PATH` - File the cart is persisted to (default: `shopper_cart.json`)
//! - `SHOPPER_CATALOG_CACHE_TTL_SECS` - How long a loaded catalog is reused (default: 300)
//! - `SHOPPER_LOAD_DELAY_MS` - Delay before each product list load, so the
//!   loading indicator is visible (default: 0)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::data::MAX_CATALOG_TTL;

const DEFAULT_CART_PATH: &str = "shopper_cart.json";
const DEFAULT_CATALOG_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_LOAD_DELAY_MS: u64 = 0;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Where the product catalog comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogLocation {
    /// The catalog compiled into the binary.
    Bundled,
    /// A JSON file on disk.
    File(PathBuf),
}

/// Shopper application configuration.
#[derive(Debug, Clone)]
pub struct ShopperConfig {
    /// Product catalog source
    pub catalog: CatalogLocation,
    /// Cart key-value store file
    pub cart_path: PathBuf,
    /// Time-to-live of the cached catalog
    pub catalog_cache_ttl: Duration,
    /// Artificial delay before each product list load
    pub load_delay: Duration,
}

impl Default for ShopperConfig {
    fn default() -> Self {
        Self {
            catalog: CatalogLocation::Bundled,
            cart_path: PathBuf::from(DEFAULT_CART_PATH),
            catalog_cache_ttl: Duration::from_secs(DEFAULT_CATALOG_CACHE_TTL_SECS),
            load_delay: Duration::from_millis(DEFAULT_LOAD_DELAY_MS),
        }
    }
}

impl ShopperConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a numeric variable cannot be parsed or the
    /// catalog cache TTL exceeds [`MAX_CATALOG_TTL`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog = lookup("SHOPPER_CATALOG_PATH")
            .filter(|path| !path.trim().is_empty())
            .map_or(CatalogLocation::Bundled, |path| {
                CatalogLocation::File(PathBuf::from(path))
            });
        let cart_path = PathBuf::from(get_or_default(&lookup, "SHOPPER_CART_PATH", DEFAULT_CART_PATH));
        let catalog_cache_ttl = Duration::from_secs(get_u64_or_default(
            &lookup,
            "SHOPPER_CATALOG_CACHE_TTL_SECS",
            DEFAULT_CATALOG_CACHE_TTL_SECS,
        )?);
        if catalog_cache_ttl > MAX_CATALOG_TTL {
            return Err(ConfigError::InvalidEnvVar(
                "SHOPPER_CATALOG_CACHE_TTL_SECS".to_string(),
                format!("must be at most {} seconds", MAX_CATALOG_TTL.as_secs()),
            ));
        }
        let load_delay = Duration::from_millis(get_u64_or_default(
            &lookup,
            "SHOPPER_LOAD_DELAY_MS",
            DEFAULT_LOAD_DELAY_MS,
        )?);

        Ok(Self {
            catalog,
            cart_path,
            catalog_cache_ttl,
            load_delay,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a variable with a default value.
fn get_or_default(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}

/// Get a numeric variable with a default value.
fn get_u64_or_default(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: u64,
) -> Result<u64, ConfigError> {
    lookup(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}
