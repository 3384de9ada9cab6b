//! Cart state engine.
//!
//! The repository owns two pieces of state:
//! - the quantity map (product id → quantity), mirrored to the [`CartStore`]
//! - the derived list of [`CartItem`]s, enriched with catalog products and
//!   published over a `watch` channel
//!
//! Mutations update the map and the store synchronously: the store is written
//! first and the map only changes if the write succeeded. Incrementing an
//! existing line updates the derived list in place. A new line needs its
//! product resolved for display, so it is appended by a spawned task once the
//! lookup finishes. Completions for different ids may therefore interleave
//! with later mutations; the derived list is not a strict log of operations.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use shopper_core::{CartItem, Product, ProductId, Quantity, QuantityError};
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use super::cart_store::{CartQuantities, CartStore, StorageError};
use super::product_repository::ProductRepository;

/// Cart repository.
///
/// Cheaply cloneable; clones share the same cart.
#[derive(Clone)]
pub struct CartRepository {
    inner: Arc<CartRepositoryInner>,
}

struct CartRepositoryInner {
    store: Arc<dyn CartStore>,
    products: Arc<dyn ProductRepository>,
    state: Mutex<CartState>,
    items_tx: watch::Sender<Vec<CartItem>>,
    count_tx: watch::Sender<u32>,
}

#[derive(Default)]
struct CartState {
    quantities: CartQuantities,
    items: Vec<CartItem>,
}

impl CartState {
    fn item_count(&self) -> u32 {
        self.quantities
            .values()
            .fold(0u32, |sum, quantity| sum.saturating_add(quantity.get()))
    }
}

impl CartRepository {
    /// Create the repository and hydrate it from `store`.
    ///
    /// The stored quantities are available as soon as this returns; the
    /// derived list fills in once every id has been resolved against
    /// `products`. A store that cannot be read starts an empty cart.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn new(store: Arc<dyn CartStore>, products: Arc<dyn ProductRepository>) -> Self {
        let (items_tx, _) = watch::channel(Vec::new());
        let (count_tx, _) = watch::channel(0);

        let repository = Self {
            inner: Arc::new(CartRepositoryInner {
                store,
                products,
                state: Mutex::new(CartState::default()),
                items_tx,
                count_tx,
            }),
        };
        repository.hydrate();
        repository
    }

    /// Current derived list.
    #[must_use]
    pub fn items(&self) -> Vec<CartItem> {
        self.inner.items_tx.borrow().clone()
    }

    /// Subscribe to the derived list.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Vec<CartItem>> {
        self.inner.items_tx.subscribe()
    }

    /// Current quantity map.
    #[must_use]
    pub fn quantities(&self) -> CartQuantities {
        self.inner.lock().quantities.clone()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        *self.inner.count_tx.borrow()
    }

    /// Subscribe to the total number of units in the cart.
    #[must_use]
    pub fn subscribe_count(&self) -> watch::Receiver<u32> {
        self.inner.count_tx.subscribe()
    }

    /// Add one unit of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the cart is left
    /// unchanged in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn add_to_cart(&self, id: ProductId) -> Result<(), StorageError> {
        let mut state = self.inner.lock();

        if let Some(&current) = state.quantities.get(&id) {
            let quantity = current.incremented();
            let mut next = state.quantities.clone();
            next.insert(id, quantity);
            self.inner.commit(&mut state, next)?;

            set_item_quantity(&mut state.items, id, quantity);
            self.inner.publish(&state);
            debug!(quantity = quantity.get(), "Incremented cart line");
            return Ok(());
        }

        let mut next = state.quantities.clone();
        next.insert(id, Quantity::ONE);
        self.inner.commit(&mut state, next)?;
        self.inner.publish(&state);
        drop(state);

        debug!("Added cart line, resolving product");
        self.enrich(id);
        Ok(())
    }

    /// Remove a product's line.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the cart is left
    /// unchanged in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn remove_from_cart(&self, id: ProductId) -> Result<(), StorageError> {
        let mut state = self.inner.lock();

        let mut next = state.quantities.clone();
        next.shift_remove(&id);
        self.inner.commit(&mut state, next)?;

        state.items.retain(|item| item.id != id);
        self.inner.publish(&state);
        debug!("Removed cart line");
        Ok(())
    }

    /// Set a product's quantity.
    ///
    /// A quantity of zero or less removes the line. Quantities beyond
    /// `u32::MAX` are clamped.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart could not be persisted; the cart is left
    /// unchanged in that case.
    #[instrument(skip(self), fields(product_id = %id))]
    pub fn change_product_quantity(&self, id: ProductId, quantity: i64) -> Result<(), StorageError> {
        let quantity = match Quantity::try_from(quantity) {
            Ok(quantity) => quantity,
            Err(QuantityError::NotPositive(_)) => return self.remove_from_cart(id),
            Err(QuantityError::TooLarge(_)) => Quantity::MAX,
        };

        let mut state = self.inner.lock();
        let is_new = !state.quantities.contains_key(&id);

        let mut next = state.quantities.clone();
        next.insert(id, quantity);
        self.inner.commit(&mut state, next)?;

        set_item_quantity(&mut state.items, id, quantity);
        self.inner.publish(&state);
        drop(state);

        debug!(quantity = quantity.get(), "Changed cart line quantity");
        if is_new {
            self.enrich(id);
        }
        Ok(())
    }

    /// Reload the quantity map from the store and resolve every line.
    fn hydrate(&self) {
        let mut state = self.inner.lock();
        state.quantities.clear();
        state.items.clear();

        match self.inner.store.load() {
            Ok(stored) => state.quantities.extend(stored),
            Err(e) => warn!(error = %e, "Cart store unreadable, starting with an empty cart"),
        }
        self.inner.publish(&state);

        let ids: Vec<ProductId> = state.quantities.keys().copied().collect();
        drop(state);
        info!(lines = ids.len(), "Cart restored from store");

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let mut resolved = Vec::with_capacity(ids.len());
            for id in ids {
                resolved.push((id, resolve(inner.products.as_ref(), id).await));
            }
            inner.append_resolved(resolved);
        });
    }

    /// Resolve a new line's product in the background and append it.
    fn enrich(&self, id: ProductId) {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            let product = resolve(inner.products.as_ref(), id).await;
            inner.append_resolved(vec![(id, product)]);
        });
    }
}

impl CartRepositoryInner {
    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Persist `next`, then make it the in-memory map.
    fn commit(&self, state: &mut CartState, next: CartQuantities) -> Result<(), StorageError> {
        self.store.save(&next).inspect_err(|e| {
            warn!(error = %e, "Failed to persist cart, keeping previous state");
        })?;
        state.quantities = next;
        Ok(())
    }

    fn publish(&self, state: &CartState) {
        self.items_tx.send_replace(state.items.clone());
        self.count_tx.send_replace(state.item_count());
    }

    /// Append lines for resolved ids that are still in the cart and not yet
    /// listed. Each line takes the id's quantity at the time of appending.
    fn append_resolved(&self, resolved: Vec<(ProductId, Option<Product>)>) {
        let mut state = self.lock();
        let mut appended = 0usize;

        for (id, product) in resolved {
            let Some(&quantity) = state.quantities.get(&id) else {
                debug!(product_id = %id, "Line removed before its product resolved");
                continue;
            };
            if state.items.iter().any(|item| item.id == id) {
                continue;
            }
            state.items.push(CartItem::new(id, quantity, product));
            appended += 1;
        }

        if appended > 0 {
            self.publish(&state);
        }
    }
}

fn set_item_quantity(items: &mut [CartItem], id: ProductId, quantity: Quantity) {
    for item in items.iter_mut().filter(|item| item.id == id) {
        item.quantity = quantity;
    }
}

/// Look up a product for display; a failed lookup leaves the line without one.
async fn resolve(products: &dyn ProductRepository, id: ProductId) -> Option<Product> {
    products.get_product(id).await.map_or_else(
        |_| {
            warn!(product_id = %id, "Product not available for cart line");
            None
        },
        Some,
    )
}
