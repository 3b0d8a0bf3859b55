//! Parsing untrusted catalog payloads.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;
use shopfront_core::{Price, Product, ProductId, Rating};
use thiserror::Error;
use tracing::{debug, warn};

use super::Catalog;

/// Why a payload could not be turned into a catalog.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON array of products")]
    NotAnArray,

    #[error("none of the {total} product records were usable")]
    NoValidRecords { total: usize },
}

/// Raw product record as sent by the catalog endpoint.
///
/// Every field is optional here so a single bad record can be dropped
/// without failing the whole payload.
#[derive(Debug, Deserialize)]
struct ProductRecord {
    id: Option<i32>,
    title: Option<String>,
    price: Option<Price>,
    category: Option<String>,
    image: Option<String>,
    rating: Option<RatingRecord>,
}

#[derive(Debug, Deserialize)]
struct RatingRecord {
    rate: Option<f64>,
    count: Option<u32>,
}

/// Parse a raw catalog payload.
///
/// The payload must be a JSON array. Records missing `id`, `title`, `price`,
/// `category` or `image`, with a negative price or one above
/// [`Price::MAX_AMOUNT`], a rating outside 0-5, or an
/// id already seen earlier in the array are dropped. A missing `rating`
/// reads as unrated. An array with records but none usable is rejected as a
/// whole, so a garbled payload never replaces a good catalog.
///
/// # Errors
///
/// Returns `ParseError` if the payload is not JSON, not an array, or holds
/// no usable record.
pub fn parse_catalog(raw: &str) -> Result<Catalog, ParseError> {
    let Value::Array(records) = serde_json::from_str::<Value>(raw)? else {
        return Err(ParseError::NotAnArray);
    };

    let total = records.len();
    let mut seen = HashSet::new();
    let products: Vec<Product> = records
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let product = convert_record(value);
            if product.is_none() {
                debug!(index, "Dropping invalid product record");
            }
            product
        })
        .filter(|product| {
            let first = seen.insert(product.id);
            if !first {
                debug!(product_id = %product.id, "Dropping duplicate product record");
            }
            first
        })
        .collect();

    if total > 0 && products.is_empty() {
        return Err(ParseError::NoValidRecords { total });
    }

    let dropped = total - products.len();
    if dropped > 0 {
        warn!(dropped, total, "Dropped invalid product records from catalog payload");
    }

    Ok(Catalog::new(products))
}

fn convert_record(value: Value) -> Option<Product> {
    let record: ProductRecord = serde_json::from_value(value).ok()?;

    let title = record.title.filter(|t| !t.trim().is_empty())?;
    let rating = match record.rating {
        Some(r) => Rating {
            rate: r.rate.unwrap_or(0.0),
            count: r.count.unwrap_or(0),
        },
        None => Rating {
            rate: 0.0,
            count: 0,
        },
    };
    if !rating.is_valid() {
        return None;
    }

    Some(Product {
        id: ProductId::new(record.id?),
        title,
        price: record.price?,
        image: record.image?,
        category: record.category?,
        rating,
    })
}
