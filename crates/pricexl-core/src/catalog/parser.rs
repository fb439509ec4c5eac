//! Page text parser turning catalog text into records.

use regex::Regex;
use tracing::{debug, trace};

use super::patterns::{DEFAULT_ROW, row_pattern};
use crate::error::ExtractionError;
use crate::models::config::PricexlConfig;
use crate::models::record::Record;

/// Parser for one catalog layout.
#[derive(Debug, Clone)]
pub struct PriceListParser {
    /// Compiled row pattern.
    pattern: Regex,
    /// Non-blank lines dropped from the top of a page.
    header_lines: usize,
    /// Non-blank lines dropped from the bottom of a page.
    footer_lines: usize,
}

impl PriceListParser {
    /// Create a parser for the default "S/." catalog with a one-line header
    /// and footer.
    pub fn new() -> Self {
        Self {
            pattern: DEFAULT_ROW.clone(),
            header_lines: 1,
            footer_lines: 1,
        }
    }

    /// Build a parser from configuration.
    pub fn from_config(config: &PricexlConfig) -> Result<Self, ExtractionError> {
        Ok(Self::new()
            .with_currency(&config.extraction.currency_symbol)?
            .with_margins(config.pdf.header_lines, config.pdf.footer_lines))
    }

    /// Use a different currency prefix.
    pub fn with_currency(mut self, currency: &str) -> Result<Self, ExtractionError> {
        if currency.trim().is_empty() {
            return Err(ExtractionError::Pattern {
                currency: currency.to_string(),
                reason: "currency symbol is empty".to_string(),
            });
        }

        self.pattern = row_pattern(currency).map_err(|e| ExtractionError::Pattern {
            currency: currency.to_string(),
            reason: e.to_string(),
        })?;
        Ok(self)
    }

    /// Set how many header and footer lines each page carries.
    pub fn with_margins(mut self, header_lines: usize, footer_lines: usize) -> Self {
        self.header_lines = header_lines;
        self.footer_lines = footer_lines;
        self
    }

    /// Join the body lines of a page: blank lines are ignored, then the
    /// header and footer lines are dropped.
    pub fn body_text<S: AsRef<str>>(&self, lines: &[S]) -> String {
        let lines: Vec<&str> = lines
            .iter()
            .map(|l| l.as_ref().trim())
            .filter(|l| !l.is_empty())
            .collect();

        let end = lines.len().saturating_sub(self.footer_lines);
        if self.header_lines >= end {
            return String::new();
        }

        lines[self.header_lines..end].join(" ")
    }

    /// Parse every row in a block of text.
    pub fn parse_text(&self, text: &str) -> Vec<Record> {
        let mut records = Vec::new();

        for caps in self.pattern.captures_iter(text) {
            let product = caps[1].replace('\n', " ").trim().to_string();
            let previous_price = caps.get(2).map(|m| m.as_str().trim().to_string());
            let current_price = caps[3].trim().to_string();

            trace!(
                "Matched row: {:?} / {:?} / {:?}",
                product, previous_price, current_price
            );
            records.push(Record::new(product, previous_price, current_price));
        }

        records
    }

    /// Parse the raw text lines of one page.
    pub fn parse_page<S: AsRef<str>>(&self, lines: &[S]) -> Vec<Record> {
        let text = self.body_text(lines);
        let records = self.parse_text(&text);
        debug!("Parsed {} records from {} chars of page text", records.len(), text.len());
        records
    }
}

impl Default for PriceListParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_single_row() {
        let parser = PriceListParser::new();
        let records = parser.parse_text("Lipstick S/. 10.00 S/. 8.00");

        assert_eq!(
            records,
            vec![Record::new("Lipstick", Some("10.00".to_string()), "8.00")]
        );
    }

    #[test]
    fn test_parse_rows_with_and_without_previous_price() {
        let parser = PriceListParser::new();
        let text = "Lipstick Rojo S/. 10.00 S/. 8.00 Rubor Compacto S/. 15.50 \
                    Delineador S/. 1,200.00 S/. 999.90";
        let records = parser.parse_text(text);

        assert_eq!(
            records,
            vec![
                Record::new("Lipstick Rojo", Some("10.00".to_string()), "8.00"),
                Record::new("Rubor Compacto", None, "15.50"),
                Record::new("Delineador", Some("1,200.00".to_string()), "999.90"),
            ]
        );
    }

    #[test]
    fn test_parse_no_match_is_empty() {
        let parser = PriceListParser::new();
        assert!(parser.parse_text("Catalogo de temporada sin precios").is_empty());
        assert!(parser.parse_text("").is_empty());
    }

    #[test]
    fn test_body_text_drops_header_and_footer() {
        let parser = PriceListParser::new();
        let lines = [
            "CATALOGO 2024",
            "",
            "Lipstick S/. 10.00",
            "S/. 8.00",
            "  ",
            "Pagina 1",
        ];

        assert_eq!(parser.body_text(&lines), "Lipstick S/. 10.00 S/. 8.00");
    }

    #[test]
    fn test_body_text_short_page() {
        let parser = PriceListParser::new();
        assert_eq!(parser.body_text(&["only"]), "");
        assert_eq!(parser.body_text(&["head", "foot"]), "");
        assert_eq!(parser.body_text::<&str>(&[]), "");
    }

    #[test]
    fn test_parse_page_skips_header_rows() {
        let parser = PriceListParser::new();
        // The header carries a price that must not become a record.
        let lines = ["Oferta S/. 1.00", "Lipstick S/. 10.00 S/. 8.00", "Pagina 2"];

        let records = parser.parse_page(&lines);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product, "Lipstick");
    }

    #[test]
    fn test_custom_currency_and_margins() {
        let parser = PriceListParser::new()
            .with_currency("USD")
            .unwrap()
            .with_margins(0, 0);
        let records = parser.parse_page(&["Mascara USD 7.25", "Base USD 9.00 USD 6.00"]);

        assert_eq!(
            records,
            vec![
                Record::new("Mascara", None, "7.25"),
                Record::new("Base", Some("9.00".to_string()), "6.00"),
            ]
        );
    }

    #[test]
    fn test_empty_currency_rejected() {
        assert!(PriceListParser::new().with_currency(" ").is_err());
    }
}
