//! Shopfront Core - Shared types library.
//!
//! This crate provides the domain types used across all Shopfront components:
//! - `shopfront` - Catalog/cart state, loader, and the widget HTTP API
//! - `cli` - Command-line tools for inspecting the catalog and cart
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients, no persistence. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product, cart entry, projection and price types

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
