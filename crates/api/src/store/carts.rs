//! Per-user cart table.

use std::collections::HashMap;

use storekeep_core::{ProductId, Quantity, UserId};

use crate::models::Cart;

/// Carts keyed by owner. A cart comes into existence the first time it is
/// asked for and is never deleted, only emptied.
#[derive(Debug, Clone, Default)]
pub struct CartTable {
    carts: HashMap<UserId, Cart>,
}

impl CartTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The user's cart, created empty on first access.
    pub fn get_or_create(&mut self, user_id: UserId) -> &mut Cart {
        self.carts
            .entry(user_id)
            .or_insert_with(|| Cart::empty(user_id))
    }

    /// The user's cart if it has ever been created.
    #[must_use]
    pub fn get(&self, user_id: UserId) -> Option<&Cart> {
        self.carts.get(&user_id)
    }

    /// Add to the user's cart, merging quantities for a product already in it.
    pub fn add_item(&mut self, user_id: UserId, product_id: ProductId, quantity: Quantity) -> &Cart {
        let cart = self.get_or_create(user_id);
        cart.add(product_id, quantity);
        cart
    }

    /// Remove a product's line; absent lines are ignored.
    pub fn remove_item(&mut self, user_id: UserId, product_id: ProductId) -> &Cart {
        let cart = self.get_or_create(user_id);
        cart.remove(product_id);
        cart
    }

    /// Empty the user's cart.
    pub fn clear(&mut self, user_id: UserId) -> &Cart {
        let cart = self.get_or_create(user_id);
        cart.clear();
        cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_get_or_create_is_idempotent() {
        let mut carts = CartTable::new();
        assert!(carts.get(UserId::new(1)).is_none());

        carts.add_item(UserId::new(1), ProductId::new(1), Quantity::ONE);
        let cart = carts.get_or_create(UserId::new(1));
        assert_eq!(cart.items.len(), 1);
    }

    #[test]
    fn test_carts_are_isolated_per_user() {
        let mut carts = CartTable::new();
        carts.add_item(UserId::new(1), ProductId::new(1), Quantity::ONE);
        carts.clear(UserId::new(2));

        assert_eq!(carts.get(UserId::new(1)).unwrap().items.len(), 1);
        assert!(carts.get(UserId::new(2)).unwrap().is_empty());
    }

    #[test]
    fn test_remove_item_on_fresh_cart_is_noop() {
        let mut carts = CartTable::new();
        let cart = carts.remove_item(UserId::new(3), ProductId::new(1));
        assert!(cart.is_empty());
        assert_eq!(cart.user_id, UserId::new(3));
    }
}
