//! Cart line type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::product::Product;
use super::quantity::Quantity;

/// One line of the cart.
///
/// `product` is `None` when the id no longer resolves against the catalog,
/// for example a stale entry restored from storage. Such a line is still
/// shown, as "product not available".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub quantity: Quantity,
    pub product: Option<Product>,
}

impl CartItem {
    /// Create a cart line.
    #[must_use]
    pub const fn new(id: ProductId, quantity: Quantity, product: Option<Product>) -> Self {
        Self {
            id,
            quantity,
            product,
        }
    }

    /// Unit price times quantity, if the product is known.
    #[must_use]
    pub fn line_total(&self) -> Option<Decimal> {
        self.product
            .as_ref()
            .map(|product| product.price().total_for(self.quantity))
    }
}
