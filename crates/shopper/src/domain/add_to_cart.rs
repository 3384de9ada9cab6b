//! Add a product to the cart.

use shopper_core::ProductId;

use crate::data::{CartRepository, StorageError};

/// Adds one unit of a product to the cart.
#[derive(Clone)]
pub struct AddToCart {
    cart: CartRepository,
}

impl AddToCart {
    #[must_use]
    pub const fn new(cart: CartRepository) -> Self {
        Self { cart }
    }

    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted.
    pub fn execute(&self, id: ProductId) -> Result<(), StorageError> {
        self.cart.add_to_cart(id)
    }
}
