//! Cart store.

use std::{num::NonZeroU32, sync::Arc};

use storefront::{Cart, LineItem};
use tokio::sync::watch;
use tracing::debug;
use uuid::Uuid;

use crate::{
    domain::cart::errors::CartStoreError,
    storage::{CART_KEY, JsonStore, KeyValueStore},
};

/// Summary published to cart observers after every change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartChange {
    /// Number of distinct lines
    pub lines: usize,

    /// Total quantity across all lines
    pub units: u64,
}

impl CartChange {
    fn of(cart: &Cart) -> Self {
        Self {
            lines: cart.len(),
            units: cart.unit_count(),
        }
    }
}

/// The persisted cart.
///
/// Every mutation is a read-modify-write of the `cart` key followed by a change
/// notification.
#[derive(Clone)]
pub struct CartStore {
    store: Arc<dyn KeyValueStore>,
    changes: watch::Sender<CartChange>,
}

impl CartStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            changes: watch::Sender::new(CartChange::default()),
        }
    }

    /// Current cart; an absent key is an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the stored cart cannot be read or decoded.
    pub fn items(&self) -> Result<Cart, CartStoreError> {
        Ok(self.store.get_json::<Cart>(CART_KEY)?.unwrap_or_default())
    }

    /// Add a line, merging its quantity into an existing line for the same product.
    ///
    /// # Errors
    ///
    /// Returns an error when the merged quantity overflows or storage fails.
    pub fn add_item(&self, item: LineItem) -> Result<Cart, CartStoreError> {
        self.update(|cart| cart.add_item(item).map_err(Into::into))
    }

    /// Replace the quantity of a line.
    ///
    /// # Errors
    ///
    /// Returns an error when the product is not in the cart or storage fails.
    pub fn set_quantity(&self, product: Uuid, qty: NonZeroU32) -> Result<Cart, CartStoreError> {
        self.update(|cart| cart.set_quantity(product, qty).map_err(Into::into))
    }

    /// Remove a line.
    ///
    /// # Errors
    ///
    /// Returns an error when the product is not in the cart or storage fails.
    pub fn remove_item(&self, product: Uuid) -> Result<LineItem, CartStoreError> {
        let mut removed = None;

        self.update(|cart| {
            removed = Some(cart.remove_item(product)?);

            Ok(())
        })?;

        removed.ok_or(CartStoreError::Cart(storefront::CartError::ItemNotFound(
            product,
        )))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error when storage fails.
    pub fn clear(&self) -> Result<(), CartStoreError> {
        self.save(&Cart::new())
    }

    /// Observe cart changes.
    pub fn subscribe(&self) -> watch::Receiver<CartChange> {
        self.changes.subscribe()
    }

    fn update(
        &self,
        apply: impl FnOnce(&mut Cart) -> Result<(), CartStoreError>,
    ) -> Result<Cart, CartStoreError> {
        let mut cart = self.items()?;

        apply(&mut cart)?;

        self.save(&cart)?;

        Ok(cart)
    }

    fn save(&self, cart: &Cart) -> Result<(), CartStoreError> {
        self.store.set_json(CART_KEY, cart)?;

        let change = CartChange::of(cart);

        debug!(lines = change.lines, units = change.units, "cart changed");

        self.changes.send_replace(change);

        Ok(())
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("current", &*self.changes.borrow())
            .finish_non_exhaustive()
    }
}
