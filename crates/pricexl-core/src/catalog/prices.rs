//! Price coercion and formatting.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::patterns::PRICE_VALUE;

/// Parse a scraped price ("8.00", "1,234.50").
///
/// Returns `None` for anything that is not a well-formed price, which the
/// writer turns into an empty cell. Comma grouping in thousands is stripped,
/// so a grouped price the row pattern matched keeps its value.
pub fn parse_price(s: &str) -> Option<Decimal> {
    let s = s.trim();
    if !PRICE_VALUE.is_match(s) {
        return None;
    }
    Decimal::from_str(&s.replace(',', "")).ok()
}

/// Format a price with two decimals, or an empty string when missing.
pub fn format_price(price: Option<Decimal>) -> String {
    price.map(|p| format!("{:.2}", p)).unwrap_or_default()
}
