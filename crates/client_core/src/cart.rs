//! Catalog and cart state with stock conservation.
//!
//! Units move between a product's local `available_quantity` and the cart; they are never
//! created or destroyed. For every product
//! `available_quantity + cart quantity == stock at load - units consumed by confirmed orders`.

use std::collections::{BTreeMap, HashMap};

use shared::{
    domain::{Product, ProductId, MAX_UNIT_PRICE},
    error::ShopError,
    protocol::{OrderItem, OrderRequest},
};
use tracing::debug;

use crate::totals::{compute_order_totals, OrderTotals};

#[derive(Debug, Clone, Default)]
pub struct Cart {
    products: Vec<Product>,
    lines: BTreeMap<ProductId, u32>,
    baseline: HashMap<ProductId, u32>,
}

impl Cart {
    /// Builds a cart over an already validated catalog (see
    /// [`shared::protocol::catalog_from_entries`]): unique ids, prices within
    /// [`MAX_UNIT_PRICE`].
    pub fn new(products: Vec<Product>) -> Self {
        let mut baseline = HashMap::with_capacity(products.len());
        for product in &products {
            debug_assert!(
                product.unit_price <= MAX_UNIT_PRICE,
                "product {} priced above the catalog cap",
                product.id
            );
            let previous = baseline.insert(product.id, product.available_quantity);
            debug_assert!(previous.is_none(), "duplicate product id {}", product.id);
        }
        Self {
            products,
            lines: BTreeMap::new(),
            baseline,
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn product(&self, product_id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == product_id)
    }

    /// Cart lines in ascending product id order.
    pub fn lines(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.lines.iter().map(|(id, qty)| (*id, *qty))
    }

    pub fn quantity(&self, product_id: ProductId) -> u32 {
        self.lines.get(&product_id).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Whether one more unit of the product can be put in the cart right now.
    pub fn can_add(&self, product_id: ProductId) -> bool {
        self.product(product_id)
            .is_some_and(|p| p.available_quantity > 0)
    }

    pub fn add(&mut self, product_id: ProductId, quantity: u32) -> Result<(), ShopError> {
        if quantity == 0 {
            return Err(ShopError::InvalidQuantity(quantity));
        }

        let in_cart = self.quantity(product_id);
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(ShopError::UnknownProduct(product_id))?;

        let ceiling = product.available_quantity + in_cart;
        if in_cart.saturating_add(quantity) > ceiling {
            let max_addable = ceiling - in_cart;
            debug!(
                product_id = %product_id,
                requested = quantity,
                max_addable,
                "cart addition exceeds remaining stock"
            );
            return Err(ShopError::LimitExceeded {
                product_id,
                max_addable,
            });
        }

        product.available_quantity -= quantity;
        *self.lines.entry(product_id).or_insert(0) += quantity;
        Ok(())
    }

    /// Takes up to `quantity` units out of the cart and puts them back on the shelf.
    ///
    /// Returns how many units were actually removed, which is never more than the cart held.
    pub fn remove(&mut self, product_id: ProductId, quantity: u32) -> Result<u32, ShopError> {
        if quantity == 0 {
            return Err(ShopError::InvalidQuantity(quantity));
        }

        let Some(current) = self.lines.get(&product_id).copied() else {
            return Ok(0);
        };
        let removed = quantity.min(current);
        let remaining = current - removed;
        if remaining == 0 {
            self.lines.remove(&product_id);
        } else {
            self.lines.insert(product_id, remaining);
        }

        if let Some(product) = self.products.iter_mut().find(|p| p.id == product_id) {
            product.available_quantity += removed;
        }
        Ok(removed)
    }

    pub fn totals(&self) -> OrderTotals {
        compute_order_totals(self)
    }

    pub fn order_request(&self) -> OrderRequest {
        OrderRequest {
            items: self
                .lines()
                .map(|(product_id, quantity)| OrderItem {
                    product_id,
                    quantity,
                })
                .collect(),
        }
    }

    /// Empties the cart after a confirmed order. Shelf counts stay as they are: the units now
    /// belong to the order.
    pub fn consume_cart(&mut self) {
        for (product_id, quantity) in std::mem::take(&mut self.lines) {
            if let Some(stock) = self.baseline.get_mut(&product_id) {
                *stock = stock.saturating_sub(quantity);
            }
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.products.iter().all(|product| {
            let stock = self.baseline.get(&product.id).copied().unwrap_or(0);
            u64::from(product.available_quantity) + u64::from(self.quantity(product.id))
                == u64::from(stock)
        })
    }
}

#[cfg(test)]
#[path = "tests/cart_tests.rs"]
mod tests;
