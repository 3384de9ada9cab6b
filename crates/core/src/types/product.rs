//! Product model.
//!
//! Products form a closed set of variants selected by the `type` field of the
//! catalog document:
//!
//! ```json
//! {
//!   "id": 1,
//!   "name": "Henriksdal",
//!   "price": { "value": 499.0, "currency": "kr" },
//!   "type": "chair",
//!   "imageUrl": "https://example.com/henriksdal.jpg",
//!   "info": { "material": "wood", "color": "black" }
//! }
//! ```
//!
//! An unknown `type` is a parse failure, never a silently skipped entry.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// Lookup by id found no product.
///
/// Carries no detail: callers treat it as "unavailable", not as an
/// exceptional condition.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[error("product not found")]
pub struct ProductNotFound;

/// Material and color of a chair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChairInfo {
    pub material: String,
    pub color: String,
}

/// Seat count and color of a couch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouchInfo {
    pub number_of_seats: u32,
    pub color: String,
}

/// A chair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chair {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub info: ChairInfo,
}

/// A couch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Couch {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    pub image_url: String,
    pub info: CouchInfo,
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Product {
    Chair(Chair),
    Couch(Couch),
}

impl Product {
    /// Stable product identifier.
    #[must_use]
    pub const fn id(&self) -> ProductId {
        match self {
            Self::Chair(chair) => chair.id,
            Self::Couch(couch) => couch.id,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Chair(chair) => &chair.name,
            Self::Couch(couch) => &couch.name,
        }
    }

    /// Unit price.
    #[must_use]
    pub const fn price(&self) -> &Price {
        match self {
            Self::Chair(chair) => &chair.price,
            Self::Couch(couch) => &couch.price,
        }
    }

    /// Image shown in lists and on the detail screen.
    #[must_use]
    pub fn image_url(&self) -> &str {
        match self {
            Self::Chair(chair) => &chair.image_url,
            Self::Couch(couch) => &couch.image_url,
        }
    }

    /// The `type` discriminator this product was decoded from.
    #[must_use]
    pub const fn product_type(&self) -> &'static str {
        match self {
            Self::Chair(_) => "chair",
            Self::Couch(_) => "couch",
        }
    }

    /// Color, which every variant carries in its info block.
    #[must_use]
    pub fn color(&self) -> &str {
        match self {
            Self::Chair(chair) => &chair.info.color,
            Self::Couch(couch) => &couch.info.color,
        }
    }

    /// Whether `"{name} {type}"` contains `needle`, ignoring case.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_query(&self, needle: &str) -> bool {
        format!("{} {}", self.name(), self.product_type())
            .to_lowercase()
            .contains(needle)
    }
}

/// The bundled catalog document: `{ "products": [...] }`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub products: Vec<Product>,
}

impl Catalog {
    /// Decode a catalog document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON, or if any product
    /// is missing a field or carries an unknown `type`.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// First product with the given id.
    #[must_use]
    pub fn find(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|product| product.id() == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    const CATALOG: &str = r#"{
        "products": [
            {
                "id": 1,
                "name": "Henriksdal",
                "price": { "value": 499.0, "currency": "kr" },
                "type": "chair",
                "imageUrl": "https://example.com/henriksdal.jpg",
                "info": { "material": "wood", "color": "black" }
            },
            {
                "id": 2,
                "name": "Lidhult",
                "price": { "value": 1035.0, "currency": "kr" },
                "type": "couch",
                "imageUrl": "https://example.com/lidhult.jpg",
                "info": { "numberOfSeats": 4, "color": "beige" },
                "promoted": true
            }
        ]
    }"#;

    #[test]
    fn test_catalog_decodes_both_variants() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        assert_eq!(catalog.products.len(), 2);

        let Product::Chair(chair) = &catalog.products[0] else {
            panic!("expected a chair");
        };
        assert_eq!(chair.info.material, "wood");
        assert_eq!(chair.price.value, Decimal::new(499, 0));

        let Product::Couch(couch) = &catalog.products[1] else {
            panic!("expected a couch");
        };
        assert_eq!(couch.info.number_of_seats, 4);
    }

    #[test]
    fn test_product_accessors() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let couch = catalog.find(ProductId::new(2)).unwrap();
        assert_eq!(couch.name(), "Lidhult");
        assert_eq!(couch.product_type(), "couch");
        assert_eq!(couch.color(), "beige");
        assert_eq!(couch.image_url(), "https://example.com/lidhult.jpg");
    }

    #[test]
    fn test_unknown_type_is_parse_failure() {
        let json = r#"{"products": [{
            "id": 3, "name": "Ektorp", "price": {"value": 1.0, "currency": "kr"},
            "type": "table", "imageUrl": "", "info": {"color": "white"}
        }]}"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_missing_type_is_parse_failure() {
        let json = r#"{"products": [{
            "id": 3, "name": "Ektorp", "price": {"value": 1.0, "currency": "kr"},
            "imageUrl": "", "info": {"material": "wood", "color": "white"}
        }]}"#;
        assert!(Catalog::from_json(json).is_err());
    }

    #[test]
    fn test_matches_query_covers_name_and_type() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let chair = catalog.find(ProductId::new(1)).unwrap();
        assert!(chair.matches_query("henrik"));
        assert!(chair.matches_query("dal chair"));
        assert!(!chair.matches_query("couch"));
    }

    #[test]
    fn test_serialize_keeps_discriminator() {
        let catalog = Catalog::from_json(CATALOG).unwrap();
        let json = serde_json::to_value(&catalog.products[0]).unwrap();
        assert_eq!(json["type"], "chair");
        assert_eq!(json["imageUrl"], "https://example.com/henriksdal.jpg");
    }
}
