//! Scan command - print the rows parsed from a catalog's text.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use console::style;
use tracing::info;

use pricexl_core::{Converter, Row, format_price};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input catalog PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Maximum number of pages to scan
    #[arg(long)]
    max_pages: Option<usize>,

    /// Currency prefix in front of every price
    #[arg(long)]
    currency: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
}

pub fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let mut config = super::load_config(config_path)?;
    if let Some(max_pages) = args.max_pages {
        config.pdf.max_pages = max_pages;
    }
    if let Some(currency) = &args.currency {
        config.extraction.currency_symbol = currency.clone();
    }

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Scanning file: {}", args.input.display());
    let rows = Converter::new(config).scan_file(&args.input)?;

    let output = match args.format {
        OutputFormat::Json => serde_json::to_string_pretty(&rows)?,
        OutputFormat::Csv => format_csv(&rows)?,
    };

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} {} rows written to {}",
            style("✓").green(),
            rows.len(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn format_csv(rows: &[Row]) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["product", "previous_price", "current_price"])?;
    for row in rows {
        let previous = format_price(row.previous_price);
        let current = format_price(row.current_price);
        wtr.write_record([row.product.as_str(), previous.as_str(), current.as_str()])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricexl_core::parse_price;

    #[test]
    fn test_format_csv() {
        let rows = vec![
            Row {
                product: "Lipstick, Rojo".to_string(),
                previous_price: parse_price("10.00"),
                current_price: parse_price("8.00"),
                image_path: None,
            },
            Row {
                product: "Rubor".to_string(),
                previous_price: None,
                current_price: parse_price("5.50"),
                image_path: None,
            },
        ];

        let csv = format_csv(&rows).unwrap();
        assert_eq!(
            csv,
            "product,previous_price,current_price\n\"Lipstick, Rojo\",10.00,8.00\nRubor,,5.50\n"
        );
    }
}
