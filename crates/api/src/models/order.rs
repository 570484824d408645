//! Order domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use storekeep_core::{OrderId, OrderStatus, Price, PriceError, ProductId, Quantity, UserId};

use super::Product;

/// A purchased line, frozen at the moment the order was placed.
///
/// Later edits to the product (price, name) or its deletion never change it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: Quantity,
    pub unit_price: Price,
    pub subtotal: Price,
}

impl OrderLine {
    /// Snapshot `quantity` units of `product` at its current price.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the subtotal does not fit.
    pub fn snapshot(product: &Product, quantity: Quantity) -> Result<Self, PriceError> {
        Ok(Self {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity,
            unit_price: product.price,
            subtotal: product.price.times(quantity)?,
        })
    }
}

/// Priced order lines and their total, ready to become an [`Order`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkout {
    items: Vec<OrderLine>,
    total_amount: Price,
}

impl Checkout {
    /// Total up `items`.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Overflow` if the total does not fit.
    pub fn new(items: Vec<OrderLine>) -> Result<Self, PriceError> {
        let total_amount = Price::total(items.iter().map(|line| line.subtotal))?;
        Ok(Self {
            items,
            total_amount,
        })
    }
}

/// A placed order. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub items: Vec<OrderLine>,
    pub total_amount: Price,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Create a pending order from a priced checkout.
    #[must_use]
    pub fn pending(id: OrderId, user_id: UserId, checkout: Checkout) -> Self {
        Self {
            id,
            user_id,
            items: checkout.items,
            total_amount: checkout.total_amount,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        }
    }
}
