//! Cart

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by cart mutations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// No line refers to the given product.
    #[error("product {0} is not in the cart")]
    ItemNotFound(Uuid),

    /// Adding to a line would overflow its quantity.
    #[error("quantity overflow for product {0}")]
    QuantityOverflow(Uuid),
}

/// A cart entry referencing a product with a quantity.
///
/// Everything except `qty` is a snapshot taken when the product was placed in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product UUID
    pub id: Uuid,

    /// Product name at the time it was added
    pub name: String,

    /// Unit price in minor units
    pub price: u64,

    /// Quantity, always at least one
    pub qty: NonZeroU32,

    /// Product image URL
    #[serde(default)]
    pub image: String,
}

impl LineItem {
    /// Create a line item.
    pub fn new(
        id: Uuid,
        name: impl Into<String>,
        price: u64,
        qty: NonZeroU32,
        image: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            qty,
            image: image.into(),
        }
    }

    /// Line total (`price * qty`), or `None` on overflow.
    pub fn line_total(&self) -> Option<u64> {
        self.price.checked_mul(u64::from(self.qty.get()))
    }
}

/// Ordered sequence of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<LineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cart from existing line items, preserving their order.
    pub fn with_items(items: impl Into<Vec<LineItem>>) -> Self {
        Self {
            items: items.into(),
        }
    }

    /// Line items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Consume the cart, returning its line items.
    pub fn into_items(self) -> Vec<LineItem> {
        self.items
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> u64 {
        self.items
            .iter()
            .map(|item| u64::from(item.qty.get()))
            .sum()
    }

    /// Add a line item. A line for the same product absorbs the added quantity instead of
    /// creating a second line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::QuantityOverflow`] if the merged quantity does not fit.
    pub fn add_item(&mut self, item: LineItem) -> Result<(), CartError> {
        let Some(existing) = self.items.iter_mut().find(|line| line.id == item.id) else {
            self.items.push(item);

            return Ok(());
        };

        existing.qty = existing
            .qty
            .checked_add(item.qty.get())
            .ok_or(CartError::QuantityOverflow(item.id))?;

        Ok(())
    }

    /// Replace the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line refers to `product`.
    pub fn set_quantity(&mut self, product: Uuid, qty: NonZeroU32) -> Result<(), CartError> {
        let line = self
            .items
            .iter_mut()
            .find(|line| line.id == product)
            .ok_or(CartError::ItemNotFound(product))?;

        line.qty = qty;

        Ok(())
    }

    /// Remove the line for `product`.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] if no line refers to `product`.
    pub fn remove_item(&mut self, product: Uuid) -> Result<LineItem, CartError> {
        let index = self
            .items
            .iter()
            .position(|line| line.id == product)
            .ok_or(CartError::ItemNotFound(product))?;

        Ok(self.items.remove(index))
    }
}

impl From<Vec<LineItem>> for Cart {
    fn from(items: Vec<LineItem>) -> Self {
        Self::with_items(items)
    }
}
