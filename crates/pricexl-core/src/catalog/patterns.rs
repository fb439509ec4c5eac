//! Regex patterns for price-list rows.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Plain decimal (10.00) or comma-grouped thousands (1,234.50)
    pub static ref PRICE_VALUE: Regex = Regex::new(
        r"^(?:\d+|\d{1,3}(?:,\d{3})+)\.\d+$"
    ).unwrap();

    // Row pattern for the default "S/." currency prefix
    pub static ref DEFAULT_ROW: Regex = row_pattern(DEFAULT_CURRENCY).unwrap();
}

/// Currency prefix of the catalog the defaults are tuned for.
pub const DEFAULT_CURRENCY: &str = "S/.";

/// Build the row pattern for a currency prefix.
///
/// Groups: 1 = product text, 2 = optional previous price, 3 = current price.
/// Dot matches newline so a product name may span joined lines.
pub fn row_pattern(currency: &str) -> Result<Regex, regex::Error> {
    let c = regex::escape(currency);
    Regex::new(&format!(
        r"(?s)(.*?)\s+(?:{c}\s*([\d,]+\.\d+)?\s+)?{c}\s*([\d,]+\.\d+|0\.00)"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_value() {
        assert!(PRICE_VALUE.is_match("10.00"));
        assert!(PRICE_VALUE.is_match("1,234.50"));
        assert!(PRICE_VALUE.is_match("12,345,678.9"));
        assert!(!PRICE_VALUE.is_match("12,34.50"));
        assert!(!PRICE_VALUE.is_match(",.5"));
        assert!(!PRICE_VALUE.is_match("10"));
    }

    #[test]
    fn test_default_row_groups() {
        let caps = DEFAULT_ROW.captures("Lipstick S/. 10.00 S/. 8.00").unwrap();
        assert_eq!(&caps[1], "Lipstick");
        assert_eq!(&caps[2], "10.00");
        assert_eq!(&caps[3], "8.00");
    }

    #[test]
    fn test_row_pattern_escapes_currency() {
        let re = row_pattern("$").unwrap();
        let caps = re.captures("Mascara $ 5.50").unwrap();
        assert_eq!(&caps[1], "Mascara");
        assert!(caps.get(2).is_none());
        assert_eq!(&caps[3], "5.50");
    }
}
