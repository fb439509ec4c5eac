//! End-to-end conversion of a catalog PDF into a workbook.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::Result;
use crate::models::config::PricexlConfig;
use crate::models::record::Row;
use crate::pdf::{PdfExtractor, PdfProcessor};
use crate::scan::{PageScan, PageScanner, page_limit};
use crate::xlsx::SheetWriter;

/// Summary of a finished conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionReport {
    pub pages: usize,
    pub records: usize,
    pub images: usize,
    /// Records that received an image.
    pub matched: usize,
    pub workbook: PathBuf,
    pub images_dir: PathBuf,
}

/// Runs scanning, alignment and workbook writing with one configuration.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    config: PricexlConfig,
}

impl Converter {
    pub fn new(config: PricexlConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricexlConfig {
        &self.config
    }

    /// Read and load the PDF at `input`.
    pub fn open(&self, input: &Path) -> Result<PdfExtractor> {
        info!("Opening {}", input.display());
        let data = fs::read(input)?;
        let mut pdf = PdfExtractor::new();
        pdf.load(&data)?;
        Ok(pdf)
    }

    /// Pages of `pdf` a conversion will scan.
    pub fn pages_to_scan<P: PdfProcessor>(&self, pdf: &P) -> usize {
        page_limit(pdf.page_count() as usize, self.config.pdf.max_pages)
    }

    /// Convert an already loaded document.
    pub fn convert<P, F>(&self, pdf: &P, workbook: &Path, mut on_page: F) -> Result<ConversionReport>
    where
        P: PdfProcessor,
        F: FnMut(&PageScan),
    {
        let images_dir = self.config.images_dir_for(workbook);
        let scanner = PageScanner::from_config(pdf, &self.config, &images_dir)?;

        let mut pages = 0;
        let mut images = 0;
        let records = scanner.scan_all(|scan| {
            pages += 1;
            images += scan.saved();
            on_page(scan);
        })?;
        let matched = records.iter().filter(|r| r.image_path.is_some()).count();

        info!("Writing {} records to {}", records.len(), workbook.display());
        let summary = SheetWriter::from_config(&self.config).write_records(&records, workbook)?;

        Ok(ConversionReport {
            pages,
            records: summary.rows,
            images,
            matched,
            workbook: workbook.to_path_buf(),
            images_dir,
        })
    }

    /// Cleaned rows parsed from the text of `input`; no images are written.
    pub fn scan_file(&self, input: &Path) -> Result<Vec<Row>> {
        let pdf = self.open(input)?;
        self.scan(&pdf)
    }

    pub fn scan<P: PdfProcessor>(&self, pdf: &P) -> Result<Vec<Row>> {
        let images_dir = self.config.images_dir_for(Path::new("."));
        let scanner = PageScanner::from_config(pdf, &self.config, images_dir)?;
        let writer = SheetWriter::from_config(&self.config);
        Ok(writer.rows(&scanner.scan_text_all()?))
    }
}
