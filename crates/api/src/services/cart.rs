//! Cart service.
//!
//! Wraps the per-user cart table with the catalog checks made before an
//! item is added.

use tracing::instrument;

use storekeep_core::{ProductId, Quantity, UserId};

use crate::models::{Cart, CartLineView, CartView};
use crate::store::Store;

/// Errors that can occur while editing a cart.
#[derive(Debug, thiserror::Error)]
pub enum CartError {
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Fewer units in stock than the quantity being added.
    #[error("insufficient stock for product {product_id}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        requested: Quantity,
        available: u32,
    },
}

pub struct CartService<'a> {
    store: &'a Store,
}

impl<'a> CartService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// The user's cart, created empty if this is the first time it is
    /// asked for.
    #[must_use]
    pub fn cart(&self, user_id: UserId) -> Cart {
        self.store.write().carts.get_or_create(user_id).clone()
    }

    /// The user's cart with each line joined to its current product.
    #[must_use]
    pub fn view(&self, user_id: UserId) -> CartView {
        let mut tables = self.store.write();
        let tables = &mut *tables;
        let cart = tables.carts.get_or_create(user_id);

        let items = cart
            .items
            .iter()
            .map(|item| CartLineView {
                product_id: item.product_id,
                quantity: item.quantity,
                product: tables.products.get(item.product_id).cloned(),
            })
            .collect();

        CartView { user_id, items }
    }

    /// Add `quantity` units of a product, merging with an existing line.
    ///
    /// Only the quantity being added is compared with stock; the merged
    /// total is checked when the order is placed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product does not exist and
    /// `CartError::InsufficientStock` if it has fewer than `quantity` units.
    #[instrument(skip(self))]
    pub fn add_item(
        &self,
        user_id: UserId,
        product_id: ProductId,
        quantity: Quantity,
    ) -> Result<Cart, CartError> {
        let mut tables = self.store.write();

        let product = tables
            .products
            .get(product_id)
            .ok_or(CartError::ProductNotFound(product_id))?;
        if product.stock < quantity.get() {
            return Err(CartError::InsufficientStock {
                product_id,
                requested: quantity,
                available: product.stock,
            });
        }

        Ok(tables.carts.add_item(user_id, product_id, quantity).clone())
    }

    /// Drop a product's line. Removing a product that is not in the cart
    /// is not an error.
    #[instrument(skip(self))]
    pub fn remove_item(&self, user_id: UserId, product_id: ProductId) -> Cart {
        self.store
            .write()
            .carts
            .remove_item(user_id, product_id)
            .clone()
    }

    #[instrument(skip(self))]
    pub fn clear(&self, user_id: UserId) -> Cart {
        self.store.write().carts.clear(user_id).clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    const ALICE: UserId = UserId::new(1);
    const BOB: UserId = UserId::new(2);
    const MOUSE: ProductId = ProductId::new(2);

    #[test]
    fn test_cart_is_created_empty() {
        let store = Store::with_demo_catalog();
        let carts = CartService::new(&store);

        let cart = carts.cart(ALICE);
        assert_eq!(cart.user_id, ALICE);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_merges_quantities() {
        let store = Store::with_demo_catalog();
        let carts = CartService::new(&store);

        carts.add_item(ALICE, MOUSE, qty(2)).unwrap();
        let cart = carts.add_item(ALICE, MOUSE, qty(3)).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.quantity_of(MOUSE), Some(qty(5)));
    }

    #[test]
    fn test_add_checks_catalog() {
        let store = Store::with_demo_catalog();
        let carts = CartService::new(&store);

        assert!(matches!(
            carts.add_item(ALICE, ProductId::new(99), qty(1)),
            Err(CartError::ProductNotFound(_))
        ));
        assert!(matches!(
            carts.add_item(ALICE, ProductId::new(1), qty(11)),
            Err(CartError::InsufficientStock { available: 10, .. })
        ));
        assert!(carts.cart(ALICE).is_empty());
    }

    #[test]
    fn test_merged_quantity_may_exceed_stock() {
        let store = Store::with_demo_catalog();
        let carts = CartService::new(&store);

        carts.add_item(ALICE, ProductId::new(1), qty(6)).unwrap();
        let cart = carts.add_item(ALICE, ProductId::new(1), qty(6)).unwrap();

        assert_eq!(cart.quantity_of(ProductId::new(1)), Some(qty(12)));
    }

    #[test]
    fn test_remove_and_clear() {
        let store = Store::with_demo_catalog();
        let carts = CartService::new(&store);
        carts.add_item(ALICE, MOUSE, qty(1)).unwrap();
        carts.add_item(ALICE, ProductId::new(3), qty(1)).unwrap();

        let cart = carts.remove_item(ALICE, ProductId::new(1));
        assert_eq!(cart.items.len(), 2);

        let cart = carts.remove_item(ALICE, MOUSE);
        assert_eq!(cart.items.len(), 1);

        assert!(carts.clear(ALICE).is_empty());
    }

    #[test]
    fn test_carts_are_per_user() {
        let store = Store::with_demo_catalog();
        let carts = CartService::new(&store);

        carts.add_item(ALICE, MOUSE, qty(1)).unwrap();
        assert!(carts.cart(BOB).is_empty());
    }

    #[test]
    fn test_view_shows_deleted_product_as_none() {
        let store = Store::with_demo_catalog();
        let carts = CartService::new(&store);
        carts.add_item(ALICE, MOUSE, qty(1)).unwrap();
        carts.add_item(ALICE, ProductId::new(3), qty(2)).unwrap();

        store.write().products.delete(MOUSE);

        let view = carts.view(ALICE);
        assert_eq!(view.items.len(), 2);
        assert!(view.items[0].product.is_none());
        assert_eq!(
            view.items[1].product.as_ref().map(|p| p.name.as_str()),
            Some("Keyboard")
        );
    }
}
