//! Shopfront library.
//!
//! Catalog loading with cache fallback, filter/sort projection, and a
//! persisted cart, plus the JSON API that drives them. Shared value types
//! live in `shopfront-core`.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
