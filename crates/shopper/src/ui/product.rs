//! Product detail screen.

use std::sync::Arc;

use serde::Serialize;
use shopper_core::{Product, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{instrument, warn};

use super::UiMessage;
use crate::data::ProductRepository;
use crate::domain::{AddToCart, CartItemCount, GetCartItemCount};

/// Snapshot of the product detail screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProductState {
    pub product: Option<Product>,
    pub message: Option<UiMessage>,
    pub cart_item_count: u32,
}

/// State container for the product detail screen.
pub struct ProductViewModel {
    products: Arc<dyn ProductRepository>,
    add_to_cart: AddToCart,
    state_tx: Arc<watch::Sender<ProductState>>,
    count_task: JoinHandle<()>,
}

impl ProductViewModel {
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(
        products: Arc<dyn ProductRepository>,
        add_to_cart: AddToCart,
        cart_item_count: &GetCartItemCount,
    ) -> Self {
        let count = cart_item_count.execute();
        let (state_tx, _) = watch::channel(ProductState {
            cart_item_count: count.current(),
            ..ProductState::default()
        });
        let state_tx = Arc::new(state_tx);
        let count_task = tokio::spawn(follow_cart_count(Arc::clone(&state_tx), count));

        Self {
            products,
            add_to_cart,
            state_tx,
            count_task,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> ProductState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<ProductState> {
        self.state_tx.subscribe()
    }

    /// Show a product picked from the list.
    pub fn show(&self, product: Product) {
        self.state_tx.send_modify(|state| state.product = Some(product));
    }

    /// Look up a product by id and show it.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn load(&self, id: ProductId) {
        let result = self.products.get_product(id).await;
        self.state_tx.send_modify(|state| match result {
            Ok(product) => state.product = Some(product),
            Err(e) => {
                warn!(error = %e, "Product unavailable");
                state.product = None;
                state.message = Some(UiMessage::ProductUnavailable);
            }
        });
    }

    /// Add one unit of the shown product to the cart.
    pub fn add_to_cart(&self) {
        let Some(id) = self.state_tx.borrow().product.as_ref().map(Product::id) else {
            return;
        };
        if self.add_to_cart.execute(id).is_err() {
            self.state_tx
                .send_modify(|state| state.message = Some(UiMessage::CartNotSaved));
        }
    }

    /// Clear the current message once it has been shown.
    pub fn on_message_shown(&self) {
        self.state_tx.send_if_modified(|state| state.message.take().is_some());
    }
}

impl Drop for ProductViewModel {
    fn drop(&mut self) {
        self.count_task.abort();
    }
}

async fn follow_cart_count(state_tx: Arc<watch::Sender<ProductState>>, mut count: CartItemCount) {
    while let Some(value) = count.changed().await {
        state_tx.send_if_modified(|state| std::mem::replace(&mut state.cart_item_count, value) != value);
    }
}
