//! Domain models for the shop.
//!
//! These are the records held by the entity store. Wire shapes that differ
//! from a record (for example a user without its password hash) are built in
//! the route handlers.

pub mod cart;
pub mod order;
pub mod product;
pub mod user;

pub use cart::{Cart, CartItem, CartLineView, CartView};
pub use order::{Checkout, Order, OrderLine};
pub use product::{Product, ProductDraft};
pub use user::User;
