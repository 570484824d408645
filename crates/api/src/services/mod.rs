//! Business logic services.
//!
//! # Services
//!
//! - `auth` - Signup, login, bearer tokens and the access-control gate
//! - `catalog` - Product CRUD
//! - `cart` - Per-user carts, with stock checks on add
//! - `orders` - The order transaction and order history
//!
//! Services are thin borrows over the shared [`Store`](crate::store::Store)
//! and are built per request from `AppState`.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod orders;

pub use auth::{AuthError, AuthService, NewUser, TokenKeys};
pub use cart::{CartError, CartService};
pub use catalog::{CatalogError, CatalogService};
pub use orders::{OrderError, OrderService};
