//! Price-list record models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::prices::parse_price;

/// One product row as scraped from a page.
///
/// Prices are kept as the text that matched; they are coerced to numbers
/// when the record is turned into a [`Row`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Product name.
    pub product: String,

    /// Price before discount, if the row shows one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_price: Option<String>,

    /// Current price.
    pub current_price: String,

    /// Extracted product image, once aligned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
}

impl Record {
    /// Create a record without an image.
    pub fn new(
        product: impl Into<String>,
        previous_price: Option<String>,
        current_price: impl Into<String>,
    ) -> Self {
        Self {
            product: product.into(),
            previous_price,
            current_price: current_price.into(),
            image_path: None,
        }
    }
}

/// Write-ready form of a [`Record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub product: String,
    pub previous_price: Option<Decimal>,
    pub current_price: Option<Decimal>,
    pub image_path: Option<PathBuf>,
}

impl Row {
    /// Clean a record: strip `artifacts` from the product name and coerce
    /// both prices, turning anything that is not a price into `None`.
    pub fn from_record(record: &Record, artifacts: &[String]) -> Self {
        let mut product = record.product.clone();
        for artifact in artifacts.iter().filter(|a| !a.is_empty()) {
            product = product.replace(artifact.as_str(), "");
        }

        Self {
            product: product.trim().to_string(),
            previous_price: record.previous_price.as_deref().and_then(parse_price),
            current_price: parse_price(&record.current_price),
            image_path: record.image_path.clone(),
        }
    }
}
