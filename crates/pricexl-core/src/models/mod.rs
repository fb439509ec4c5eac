//! Data models for the conversion pipeline.

pub mod config;
pub mod record;

pub use config::{AlignmentPolicy, PricexlConfig};
pub use record::{Record, Row};
