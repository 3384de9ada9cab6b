//! Product list screen.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use shopper_core::{Product, ProductId};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, instrument, warn};

use super::UiMessage;
use crate::domain::{AddToCart, CartItemCount, GetCartItemCount, GetProducts};

/// Snapshot of the product list screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HomeState {
    pub is_loading: bool,
    pub products: Vec<Product>,
    pub message: Option<UiMessage>,
    pub search_query: Option<String>,
    pub cart_item_count: u32,
}

/// State container for the product list screen.
///
/// Only the most recent load may publish results: starting a new load aborts
/// the one in flight, and every load carries a generation number that is
/// checked before its results are written.
pub struct HomeViewModel {
    inner: Arc<HomeInner>,
    count_task: JoinHandle<()>,
}

struct HomeInner {
    get_products: GetProducts,
    add_to_cart: AddToCart,
    load_delay: Duration,
    state_tx: watch::Sender<HomeState>,
    load: Mutex<LoadSlot>,
}

#[derive(Default)]
struct LoadSlot {
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl HomeViewModel {
    /// Create the container. No load is started until [`Self::get_products`].
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(
        get_products: GetProducts,
        add_to_cart: AddToCart,
        cart_item_count: &GetCartItemCount,
        load_delay: Duration,
    ) -> Self {
        let count = cart_item_count.execute();
        let (state_tx, _) = watch::channel(HomeState {
            cart_item_count: count.current(),
            ..HomeState::default()
        });

        let inner = Arc::new(HomeInner {
            get_products,
            add_to_cart,
            load_delay,
            state_tx,
            load: Mutex::new(LoadSlot::default()),
        });
        let count_task = tokio::spawn(follow_cart_count(Arc::clone(&inner), count));

        Self { inner, count_task }
    }

    /// Current snapshot.
    #[must_use]
    pub fn state(&self) -> HomeState {
        self.inner.state_tx.borrow().clone()
    }

    /// Subscribe to snapshots.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<HomeState> {
        self.inner.state_tx.subscribe()
    }

    /// Load products for `query`, replacing any load still in flight.
    ///
    /// Surrounding whitespace is stripped from the query before searching.
    #[instrument(skip(self))]
    pub fn get_products(&self, query: Option<&str>) {
        let query = query.map(|q| q.trim().to_owned());
        let mut slot = self.inner.lock_load();

        if let Some(previous) = slot.task.take() {
            previous.abort();
        }
        slot.generation += 1;
        let generation = slot.generation;

        self.inner.state_tx.send_modify(|state| state.is_loading = true);

        let inner = Arc::clone(&self.inner);
        slot.task = Some(tokio::spawn(async move {
            if !inner.load_delay.is_zero() {
                tokio::time::sleep(inner.load_delay).await;
            }
            let result = inner.get_products.execute(query.as_deref()).await;

            // Holding the slot lock orders this write against a newer load
            let slot = inner.lock_load();
            if slot.generation != generation {
                debug!(generation, "Discarding stale product load");
                return;
            }
            inner.state_tx.send_modify(|state| {
                match result {
                    Ok(products) => {
                        debug!(count = products.len(), "Products loaded");
                        state.products = products;
                        state.search_query = query;
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to load products");
                        state.message = Some(UiMessage::CannotGetProducts);
                    }
                }
                state.is_loading = false;
            });
            drop(slot);
        }));
    }

    /// Reload with the query of the last successful load.
    pub fn refresh_products(&self) {
        let query = self.inner.state_tx.borrow().search_query.clone();
        self.get_products(query.as_deref());
    }

    /// Clear the current message once it has been shown.
    pub fn on_message_shown(&self) {
        self.inner.state_tx.send_if_modified(|state| state.message.take().is_some());
    }

    /// Add one unit of a product to the cart.
    pub fn add_product_to_cart(&self, id: ProductId) {
        if self.inner.add_to_cart.execute(id).is_err() {
            self.inner
                .state_tx
                .send_modify(|state| state.message = Some(UiMessage::CartNotSaved));
        }
    }
}

impl Drop for HomeViewModel {
    fn drop(&mut self) {
        self.count_task.abort();
        if let Some(task) = self.inner.lock_load().task.take() {
            task.abort();
        }
    }
}

impl HomeInner {
    fn lock_load(&self) -> MutexGuard<'_, LoadSlot> {
        self.load.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

async fn follow_cart_count(inner: Arc<HomeInner>, mut count: CartItemCount) {
    while let Some(value) = count.changed().await {
        inner
            .state_tx
            .send_if_modified(|state| std::mem::replace(&mut state.cart_item_count, value) != value);
    }
}
