//! Core library for converting PDF price-list catalogs into XLSX workbooks.
//!
//! This crate provides:
//! - PDF processing (per-page text lines and drawn image placements)
//! - Price-list row parsing with a currency-prefixed pattern
//! - Pairing of product images with parsed rows
//! - XLSX generation with pictures anchored in their rows

pub mod catalog;
pub mod convert;
pub mod error;
pub mod models;
pub mod pdf;
pub mod scan;
pub mod xlsx;

pub use catalog::{PriceListParser, align_page, format_price, parse_price};
pub use convert::{ConversionReport, Converter};
pub use error::{PricexlError, Result};
pub use models::{AlignmentPolicy, PricexlConfig, Record, Row};
pub use pdf::{PdfExtractor, PdfProcessor};
pub use scan::{PageScan, PageScanner};
pub use xlsx::{HEADERS, SheetWriter, WriteSummary};
