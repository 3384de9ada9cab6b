//! Cart badge count.

use tokio::sync::watch;

use crate::data::CartRepository;

/// Observes the total number of units in the cart.
#[derive(Clone)]
pub struct GetCartItemCount {
    cart: CartRepository,
}

impl GetCartItemCount {
    #[must_use]
    pub const fn new(cart: CartRepository) -> Self {
        Self { cart }
    }

    /// Start observing the count.
    #[must_use]
    pub fn execute(&self) -> CartItemCount {
        CartItemCount {
            rx: self.cart.subscribe_count(),
        }
    }
}

/// Live view of the cart's unit count.
#[derive(Debug, Clone)]
pub struct CartItemCount {
    rx: watch::Receiver<u32>,
}

impl CartItemCount {
    /// Latest count.
    #[must_use]
    pub fn current(&self) -> u32 {
        *self.rx.borrow()
    }

    /// Wait for the count to change.
    ///
    /// Returns `None` once the cart repository has gone away.
    pub async fn changed(&mut self) -> Option<u32> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::data::{BundledProductSource, CatalogProductRepository, MemoryCartStore};
    use shopper_core::ProductId;
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_count_follows_cart() {
        let products = Arc::new(CatalogProductRepository::new(Arc::new(
            BundledProductSource::new(Duration::from_secs(60)),
        )));
        let cart = CartRepository::new(Arc::new(MemoryCartStore::new()), products);
        let mut count = GetCartItemCount::new(cart.clone()).execute();
        assert_eq!(count.current(), 0);

        cart.add_to_cart(ProductId::new(1)).unwrap();
        assert_eq!(count.changed().await, Some(1));

        cart.add_to_cart(ProductId::new(1)).unwrap();
        cart.add_to_cart(ProductId::new(2)).unwrap();
        assert_eq!(count.changed().await, Some(3));
    }
}
