//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for the catalog and cart domain.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod projection;

pub use cart::CartEntry;
pub use id::*;
pub use price::{Price, PriceError};
pub use product::{MAX_RATING, Product, Rating, StarBreakdown};
pub use projection::{ALL_CATEGORIES, CategoryFilter, ParseSortKeyError, SortKey};
