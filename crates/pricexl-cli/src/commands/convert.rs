//! Convert command - turn a catalog PDF into a workbook.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use pricexl_core::models::config::PricexlConfig;
use pricexl_core::pdf::PdfProcessor;
use pricexl_core::{AlignmentPolicy, Converter};

/// Arguments for the convert command.
#[derive(Args)]
pub struct ConvertArgs {
    /// Input catalog PDF
    #[arg(required = true)]
    input: PathBuf,

    /// Output workbook (default: input with .xlsx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for extracted images (default: "images" next to the output)
    #[arg(long)]
    images_dir: Option<PathBuf>,

    /// Maximum number of pages to scan
    #[arg(long)]
    max_pages: Option<usize>,

    /// Currency prefix in front of every price
    #[arg(long)]
    currency: Option<String>,

    /// Drop surplus images on a page instead of failing
    #[arg(long)]
    lenient: bool,
}

impl ConvertArgs {
    fn apply(&self, config: &mut PricexlConfig) {
        if let Some(dir) = &self.images_dir {
            config.output.images_dir = Some(dir.clone());
        }
        if let Some(max_pages) = self.max_pages {
            config.pdf.max_pages = max_pages;
        }
        if let Some(currency) = &self.currency {
            config.extraction.currency_symbol = currency.clone();
        }
        if self.lenient {
            config.extraction.alignment = AlignmentPolicy::Lenient;
        }
    }
}

pub fn run(args: ConvertArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = super::load_config(config_path)?;
    args.apply(&mut config);

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("xlsx"));

    info!("Processing file: {}", args.input.display());

    let converter = Converter::new(config);
    let pdf = converter.open(&args.input)?;
    let pages = converter.pages_to_scan(&pdf);
    debug!("PDF has {} pages, scanning {}", pdf.page_count(), pages);

    let pb = ProgressBar::new(pages as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")?
            .progress_chars("##-"),
    );
    pb.set_message("Scanning pages...");

    let report = converter.convert(&pdf, &output, |scan| {
        let line = format!(
            "Page {}: {} records, {} images",
            scan.page_index + 1,
            scan.records.len(),
            scan.saved()
        );
        if pb.is_hidden() {
            println!("{}", line);
        } else {
            pb.println(line);
        }
        pb.inc(1);
    })?;

    pb.finish_and_clear();

    println!(
        "{} Wrote {} rows ({} with images) from {} pages to {}",
        style("✓").green(),
        report.records,
        report.matched,
        report.pages,
        report.workbook.display()
    );
    println!(
        "{} {} images saved in {}",
        style("ℹ").blue(),
        report.images,
        report.images_dir.display()
    );

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
