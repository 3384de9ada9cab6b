//! Integration tests for Shopper.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopper-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `catalog` - catalog files, search and product lookup through the app
//! - `cart_flow` - cart persistence across restarts and the screen containers
//!
//! Everything runs against temporary directories; no external services are
//! needed.

use std::path::{Path, PathBuf};

/// Catalog document used by the file-backed tests.
pub const CATALOG: &str = r#"{"products": [
    {
        "id": 1, "name": "Henriksdal", "price": {"value": 499.0, "currency": "kr"},
        "type": "chair", "imageUrl": "https://example.test/henriksdal.jpg",
        "info": {"material": "wood", "color": "black"}
    },
    {
        "id": 2, "name": "Lidhult", "price": {"value": 1035.0, "currency": "kr"},
        "type": "couch", "imageUrl": "https://example.test/lidhult.jpg",
        "info": {"numberOfSeats": 4, "color": "beige"}
    },
    {
        "id": 5, "name": "Stefan", "price": {"value": 395.0, "currency": "kr"},
        "type": "chair", "imageUrl": "https://example.test/stefan.jpg",
        "info": {"material": "pine", "color": "brown-black"},
        "discontinued": false
    }
]}"#;

/// Write [`CATALOG`] into `dir` and return its path.
///
/// # Errors
///
/// Returns an error if the file cannot be written.
pub fn write_catalog(dir: &Path) -> std::io::Result<PathBuf> {
    let path = dir.join("products.json");
    std::fs::write(&path, CATALOG)?;
    Ok(path)
}
