//! Order placement.
//!
//! Turning a cart into an order touches three tables: every product on the
//! cart loses stock, an order is created, and the cart is emptied. All of it
//! happens under a single write guard, in two passes:
//!
//! 1. Check every line against the catalog, snapshot its price and total
//!    the order, then record it. Recording is the first write and nothing
//!    before it can leave a trace, so any failure leaves the store as it was.
//! 2. Decrement stock for every line and clear the cart. Neither can fail.

use tracing::instrument;

use storekeep_core::{OrderId, ProductId, Quantity, UserId};

use crate::models::{Checkout, Order, OrderLine};
use crate::store::{IdSpaceExhausted, Store, Tables};

/// Reasons an order cannot be placed.
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("cart is empty")]
    EmptyCart,

    /// A cart line refers to a product that has since been deleted.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    #[error("insufficient stock for {product_name}: requested {requested}, available {available}")]
    InsufficientStock {
        product_id: ProductId,
        product_name: String,
        requested: Quantity,
        available: u32,
    },

    /// A subtotal or the order total does not fit in a price.
    #[error("order total is too large")]
    TotalTooLarge,

    /// No order with this id belongs to the caller.
    #[error("order {0} not found")]
    NotFound(OrderId),

    #[error(transparent)]
    Store(#[from] IdSpaceExhausted),
}

pub struct OrderService<'a> {
    store: &'a Store,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Place an order for everything in the user's cart.
    ///
    /// Either the whole cart is bought or nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::EmptyCart` for an empty cart,
    /// `OrderError::ProductNotFound` if a line's product no longer exists,
    /// `OrderError::InsufficientStock` naming the first line whose quantity
    /// exceeds stock and `OrderError::TotalTooLarge` if the amounts overflow.
    #[instrument(skip(self))]
    pub fn place_order(&self, user_id: UserId) -> Result<Order, OrderError> {
        let mut guard = self.store.write();
        let Tables {
            products,
            carts,
            orders,
            ..
        } = &mut *guard;

        let cart = carts.get_or_create(user_id);
        if cart.is_empty() {
            tracing::warn!(%user_id, "order rejected: cart is empty");
            return Err(OrderError::EmptyCart);
        }

        let checkout = cart
            .items
            .iter()
            .map(|item| {
                let product = products
                    .get(item.product_id)
                    .ok_or(OrderError::ProductNotFound(item.product_id))?;
                if product.stock < item.quantity.get() {
                    return Err(OrderError::InsufficientStock {
                        product_id: product.id,
                        product_name: product.name.clone(),
                        requested: item.quantity,
                        available: product.stock,
                    });
                }
                OrderLine::snapshot(product, item.quantity).map_err(|_| OrderError::TotalTooLarge)
            })
            .collect::<Result<Vec<_>, _>>()
            .and_then(|lines| Checkout::new(lines).map_err(|_| OrderError::TotalTooLarge))
            .inspect_err(|e| tracing::warn!(%user_id, error = %e, "order rejected"))?;

        let order = orders
            .create_returning(|id| Order::pending(id, user_id, checkout))?
            .clone();

        for line in &order.items {
            if let Some(product) = products.get_mut(line.product_id) {
                product.stock = product.stock.saturating_sub(line.quantity.get());
            }
        }
        cart.clear();
        drop(guard);

        tracing::info!(
            order_id = %order.id,
            %user_id,
            total = %order.total_amount,
            lines = order.items.len(),
            "order placed"
        );
        Ok(order)
    }

    /// The user's orders, oldest first.
    #[must_use]
    pub fn orders_for_user(&self, user_id: UserId) -> Vec<Order> {
        self.store
            .read()
            .orders
            .list()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect()
    }

    /// One of the user's orders.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order does not exist or belongs
    /// to someone else.
    pub fn order_for_user(&self, user_id: UserId, order_id: OrderId) -> Result<Order, OrderError> {
        self.store
            .read()
            .orders
            .get(order_id)
            .filter(|o| o.user_id == user_id)
            .cloned()
            .ok_or(OrderError::NotFound(order_id))
    }
}
