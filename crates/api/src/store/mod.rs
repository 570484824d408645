//! In-memory entity store.
//!
//! # Tables
//!
//! - `users` - registered accounts (`UserId`)
//! - `products` - the catalog (`ProductId`)
//! - `carts` - one cart per user, keyed by `UserId`
//! - `orders` - placed orders (`OrderId`)
//!
//! # Locking
//!
//! All four tables sit behind one `RwLock`. Reads share the lock; every
//! mutation, and in particular the whole order transaction, holds the write
//! guard from first read to last write. Two orders drawing on the same stock
//! are therefore serialized and the second one sees the first one's
//! decrement.
//!
//! The store is owned by `AppState` and handed to services explicitly; tests
//! build a fresh one per case.

pub mod carts;
pub mod table;

use chrono::Utc;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use rust_decimal::Decimal;

use storekeep_core::{OrderId, Price, ProductId, UserId};

pub use carts::CartTable;
pub use table::{IdSpaceExhausted, Table};

use crate::models::{Order, Product, User};

/// The four entity tables.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub users: Table<UserId, User>,
    pub products: Table<ProductId, Product>,
    pub carts: CartTable,
    pub orders: Table<OrderId, Order>,
}

/// Shared, lock-protected entity store.
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose catalog starts with the demo products (ids 1-3).
    #[must_use]
    pub fn with_demo_catalog() -> Self {
        Self::from_tables(Tables {
            products: Table::seeded(demo_catalog().into_iter().map(|p| (p.id, p))),
            ..Tables::default()
        })
    }

    /// Wrap pre-built tables.
    #[must_use]
    pub fn from_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Shared read access to every table.
    pub fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read()
    }

    /// Exclusive access to every table. Hold the guard for the whole of a
    /// read-check-write sequence.
    pub fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write()
    }
}

/// The products a fresh shop starts with.
fn demo_catalog() -> Vec<Product> {
    let now = Utc::now();
    [
        (1, "Laptop", "High-performance laptop", 99_999, 10),
        (2, "Mouse", "Wireless mouse", 2_999, 50),
        (3, "Keyboard", "Mechanical keyboard", 14_999, 30),
    ]
    .into_iter()
    .map(|(id, name, description, cents, stock)| Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: description.to_string(),
        price: Price::new(Decimal::new(cents, 2)).unwrap_or(Price::ZERO),
        stock,
        created_at: now,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_catalog_ids_and_counter() {
        let store = Store::with_demo_catalog();
        let mut tables = store.write();

        assert_eq!(tables.products.len(), 3);
        let laptop = tables.products.get(ProductId::new(1));
        assert_eq!(laptop.map(|p| p.price.to_string()), Some("999.99".to_string()));

        let next = tables.products.create(|id| Product {
            id,
            name: "Monitor".to_string(),
            description: "27 inch".to_string(),
            price: Price::ZERO,
            stock: 1,
            created_at: Utc::now(),
        });
        assert_eq!(next, Ok(ProductId::new(4)));
    }

    #[test]
    fn test_fresh_stores_are_isolated() {
        let a = Store::with_demo_catalog();
        let b = Store::with_demo_catalog();

        a.write().products.delete(ProductId::new(1));

        assert_eq!(a.read().products.len(), 2);
        assert_eq!(b.read().products.len(), 3);
    }
}
