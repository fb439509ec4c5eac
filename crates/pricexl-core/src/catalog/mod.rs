//! Price-list record extraction.

mod align;
mod parser;
pub mod patterns;
pub mod prices;

pub use align::align_page;
pub use parser::PriceListParser;
pub use prices::{format_price, parse_price};
