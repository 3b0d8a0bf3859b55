//! Filter and sort controls for catalog projections.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Category value that disables filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Which products a projection keeps.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    /// No filtering.
    #[default]
    All,
    /// Only products whose category equals this value exactly.
    Only(String),
}

impl CategoryFilter {
    /// Whether a product category passes the filter.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

impl From<Option<&str>> for CategoryFilter {
    fn from(value: Option<&str>) -> Self {
        match value {
            None => Self::All,
            Some(v) if v.is_empty() || v == ALL_CATEGORIES => Self::All,
            Some(v) => Self::Only(v.to_string()),
        }
    }
}

impl From<&str> for CategoryFilter {
    fn from(value: &str) -> Self {
        Self::from(Some(value))
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(ALL_CATEGORIES),
            Self::Only(category) => f.write_str(category),
        }
    }
}

/// Ordering applied by a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Catalog order.
    #[default]
    None,
    PriceAsc,
    PriceDesc,
    /// By title.
    Name,
}

/// Unknown sort key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort key: {0} (expected none, price-asc, price-desc or name)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" | "default" => Ok(Self::None),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name" => Ok(Self::Name),
            other => Err(ParseSortKeyError(other.to_string())),
        }
    }
}

impl SortKey {
    /// The wire name of the key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::Name => "name",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
