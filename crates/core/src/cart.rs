//! Visitor cart.
//!
//! The cart is a list of product snapshots with quantities. It is held by the
//! visitor (the storefront keeps it in the session), so every mutation is
//! checked against the stock count carried on the snapshot. Adding an item
//! refreshes that snapshot from the current product record.

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::types::{Price, ProductId, Slug, StockCount};

/// Errors raised by cart operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartError {
    /// The requested quantity exceeds the units on hand.
    #[error("Sorry. Product is out of stock")]
    OutOfStock {
        /// Units requested.
        requested: u32,
        /// Units on hand.
        available: StockCount,
    },

    /// The slug is not in the cart.
    #[error("item {0} is not in the cart")]
    NotInCart(Slug),
}

/// One cart line: a product snapshot plus the chosen quantity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub slug: Slug,
    pub name: String,
    pub image: String,
    pub price: Price,
    pub count_in_stock: StockCount,
    pub quantity: u32,
}

impl CartItem {
    /// Snapshot a product with the given quantity.
    #[must_use]
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            slug: product.slug.clone(),
            name: product.name.clone(),
            image: product.image_url().to_string(),
            price: product.price,
            count_in_stock: product.count_in_stock,
            quantity,
        }
    }

    /// Price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    #[serde(rename = "cartItems")]
    items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Cart lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find a line by product slug.
    #[must_use]
    pub fn get(&self, slug: &Slug) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.slug == slug)
    }

    /// Add one unit of a product.
    ///
    /// A product already in the cart goes up by one; a new product starts at
    /// one. The line's snapshot is refreshed from `product`.
    ///
    /// Returns the line's new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] when stock cannot cover the new
    /// quantity. The cart is unchanged in that case.
    pub fn add(&mut self, product: &Product) -> Result<u32, CartError> {
        let quantity = self
            .get(&product.slug)
            .map_or(1, |existing| existing.quantity.saturating_add(1));

        if !product.count_in_stock.covers(quantity) {
            return Err(CartError::OutOfStock {
                requested: quantity,
                available: product.count_in_stock,
            });
        }

        let item = CartItem::from_product(product, quantity);
        match self.items.iter_mut().find(|line| line.slug == product.slug) {
            Some(line) => *line = item,
            None => self.items.push(item),
        }
        Ok(quantity)
    }

    /// Set the quantity of an existing line. Zero removes it.
    ///
    /// `product` is the current catalog record. The stock check uses it, not
    /// the snapshot taken when the line was added, and the snapshot is
    /// refreshed on success.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::NotInCart`] when `product` has no line and
    /// [`CartError::OutOfStock`] when current stock cannot cover `quantity`.
    /// The cart is unchanged on error.
    pub fn update_quantity(&mut self, product: &Product, quantity: u32) -> Result<(), CartError> {
        let Some(line) = self.items.iter_mut().find(|line| line.slug == product.slug) else {
            return Err(CartError::NotInCart(product.slug.clone()));
        };

        if quantity == 0 {
            self.remove(&product.slug);
            return Ok(());
        }

        if !product.count_in_stock.covers(quantity) {
            return Err(CartError::OutOfStock {
                requested: quantity,
                available: product.count_in_stock,
            });
        }
        *line = CartItem::from_product(product, quantity);
        Ok(())
    }

    /// Remove a line. Returns whether anything was removed.
    pub fn remove(&mut self, slug: &Slug) -> bool {
        let before = self.items.len();
        self.items.retain(|item| &item.slug != slug);
        self.items.len() != before
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of line totals.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}
