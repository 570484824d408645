//! Cart domain types.

use serde::Serialize;

use storekeep_core::{ProductId, Quantity, UserId};

use super::Product;

/// One line of a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// A user's shopping cart.
///
/// Holds at most one line per product, in the order products were first
/// added. None of these operations look at the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub user_id: UserId,
    pub items: Vec<CartItem>,
}

impl Cart {
    /// An empty cart for `user_id`.
    #[must_use]
    pub const fn empty(user_id: UserId) -> Self {
        Self {
            user_id,
            items: Vec::new(),
        }
    }

    /// Add `quantity` of a product, merging into an existing line.
    pub fn add(&mut self, product_id: ProductId, quantity: Quantity) {
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => item.quantity = item.quantity.merge(quantity),
            None => self.items.push(CartItem {
                product_id,
                quantity,
            }),
        }
    }

    /// Remove the line for a product. Returns `false` if there was none.
    pub fn remove(&mut self, product_id: ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.product_id != product_id);
        self.items.len() != before
    }

    /// Drop every line.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Quantity of a product currently in the cart.
    #[must_use]
    pub fn quantity_of(&self, product_id: ProductId) -> Option<Quantity> {
        self.items
            .iter()
            .find(|i| i.product_id == product_id)
            .map(|i| i.quantity)
    }
}

/// A cart line joined with the current catalog record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    pub product_id: ProductId,
    pub quantity: Quantity,
    /// `None` once the product has been deleted from the catalog.
    pub product: Option<Product>,
}

/// A cart as shown to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub user_id: UserId,
    pub items: Vec<CartLineView>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn test_add_same_product_merges() {
        let mut cart = Cart::empty(UserId::new(1));
        cart.add(ProductId::new(2), qty(2));
        cart.add(ProductId::new(2), qty(3));

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(2)), Some(qty(5)));
    }

    #[test]
    fn test_add_keeps_first_added_order() {
        let mut cart = Cart::empty(UserId::new(1));
        cart.add(ProductId::new(3), qty(1));
        cart.add(ProductId::new(1), qty(1));
        cart.add(ProductId::new(3), qty(1));

        let ids: Vec<_> = cart.items.iter().map(|i| i.product_id).collect();
        assert_eq!(ids, vec![ProductId::new(3), ProductId::new(1)]);
    }

    #[test]
    fn test_remove_missing_line_is_noop() {
        let mut cart = Cart::empty(UserId::new(1));
        cart.add(ProductId::new(1), qty(1));

        assert!(!cart.remove(ProductId::new(9)));
        assert_eq!(cart.items.len(), 1);
        assert!(cart.remove(ProductId::new(1)));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_clear_keeps_owner() {
        let mut cart = Cart::empty(UserId::new(4));
        cart.add(ProductId::new(1), qty(2));
        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.user_id, UserId::new(4));
    }
}
