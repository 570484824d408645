//! Storekeep shop API library.
//!
//! Users, a product catalog, per-user carts and order placement over a
//! process-local entity store. The binary in `main.rs` only wires config,
//! logging and the listener around [`routes::app`]; everything else lives
//! here so it can be driven directly by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;

pub use routes::app;
pub use state::AppState;
