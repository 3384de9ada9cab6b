//! Cart screen.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use shopper_core::{CartItem, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use super::UiMessage;
use crate::data::{CartRepository, StorageError};
use crate::domain::AddToCart;

/// Snapshot of the cart screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
    /// Sum of `price × quantity` over lines whose product is known.
    pub total_price: Decimal,
    pub message: Option<UiMessage>,
}

impl CartState {
    fn with_items(&mut self, items: Vec<CartItem>) {
        self.total_price = items.iter().filter_map(CartItem::line_total).sum();
        self.items = items;
    }
}

/// State container for the cart screen. Follows the cart repository.
pub struct CartViewModel {
    cart: CartRepository,
    add_to_cart: AddToCart,
    state_tx: Arc<watch::Sender<CartState>>,
    items_task: JoinHandle<()>,
}

impl CartViewModel {
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(cart: CartRepository) -> Self {
        let mut items_rx = cart.subscribe();
        let mut initial = CartState::default();
        initial.with_items(items_rx.borrow_and_update().clone());

        let (state_tx, _) = watch::channel(initial);
        let state_tx = Arc::new(state_tx);
        let items_task = tokio::spawn(follow_items(Arc::clone(&state_tx), items_rx));

        Self {
            add_to_cart: AddToCart::new(cart.clone()),
            cart,
            state_tx,
            items_task,
        }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> CartState {
        self.state_tx.borrow().clone()
    }

    /// Subscribe to snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state_tx.subscribe()
    }

    /// Add one unit to a line.
    pub fn increase(&self, id: ProductId) {
        self.report(self.add_to_cart.execute(id));
    }

    /// Set a line's quantity; zero or less removes it.
    pub fn change_quantity(&self, id: ProductId, quantity: i64) {
        self.report(self.cart.change_product_quantity(id, quantity));
    }

    /// Remove a line.
    pub fn remove(&self, id: ProductId) {
        self.report(self.cart.remove_from_cart(id));
    }

    /// Clear the current message once it has been shown.
    pub fn on_message_shown(&self) {
        self.state_tx.send_if_modified(|state| state.message.take().is_some());
    }

    fn report(&self, result: Result<(), StorageError>) {
        if result.is_err() {
            self.state_tx
                .send_modify(|state| state.message = Some(UiMessage::CartNotSaved));
        }
    }
}

impl Drop for CartViewModel {
    fn drop(&mut self) {
        self.items_task.abort();
    }
}

async fn follow_items(state_tx: Arc<watch::Sender<CartState>>, mut items_rx: watch::Receiver<Vec<CartItem>>) {
    while items_rx.changed().await.is_ok() {
        let items = items_rx.borrow_and_update().clone();
        state_tx.send_modify(|state| state.with_items(items));
    }
}
