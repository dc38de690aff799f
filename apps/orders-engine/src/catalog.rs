//! Product catalog import.
//!
//! Loads the inventory start position from a 5-field CSV file
//! (`id,name,stock,unit,price`). Individually malformed records are
//! skipped with a warning so one bad row never sinks the whole import.

use std::path::Path;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::Product;

/// Errors from catalog import.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog file could not be opened or read.
    #[error("failed to read catalog: {0}")]
    Read(#[from] csv::Error),
}

/// Load all well-formed products from the catalog file at `path`.
pub fn load_products(path: impl AsRef<Path>) -> Result<Vec<Product>, CatalogError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let mut products = Vec::new();
    for record in reader.records() {
        let Ok(record) = record else {
            tracing::warn!("skipping unreadable catalog record");
            continue;
        };
        match parse_record(&record) {
            Some(product) => products.push(product),
            None => {
                tracing::warn!(record = ?record, "skipping malformed catalog record");
            }
        }
    }
    Ok(products)
}

fn parse_record(record: &csv::StringRecord) -> Option<Product> {
    if record.len() != 5 {
        return None;
    }
    let stock: i64 = record[2].trim().parse().ok()?;
    let price: Decimal = record[4].trim().parse().ok()?;
    if stock < 0 || price < Decimal::ZERO {
        return None;
    }
    Some(Product {
        id: record[0].trim().to_owned(),
        name: format!("{}({})", record[1].trim(), record[3].trim()),
        price,
        stock,
    })
}
