//! Storekeep Core - Domain value types.
//!
//! This crate provides the small, validated value types shared by the
//! Storekeep API and its tests:
//! - typed entity ids that cannot be mixed up
//! - `Email`, `Price` and `Quantity`, which can only hold valid values
//! - `Role` and `OrderStatus`
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage, no HTTP.
//! Every invariant that can be expressed in a type lives here so the API
//! crate never has to re-check it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
