//! Type-safe price representation using decimal arithmetic.
//!
//! The catalog document carries prices as JSON numbers with a free-form
//! currency label (e.g. `{"value": 1035.0, "currency": "kr"}`). Values are
//! held as [`Decimal`] so cart totals add up exactly.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::quantity::Quantity;

/// A price with currency information.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit.
    #[serde(with = "rust_decimal::serde::float")]
    pub value: Decimal,
    /// Currency label as it appears in the catalog.
    pub currency: String,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub fn new(value: Decimal, currency: impl Into<String>) -> Self {
        Self {
            value,
            currency: currency.into(),
        }
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn total_for(&self, quantity: Quantity) -> Decimal {
        self.value * Decimal::from(quantity.get())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.currency)
    }
}
