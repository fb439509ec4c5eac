//! Page scanning: records from page text, product images saved to disk.

use std::fs;
use std::path::{Path, PathBuf};

use image::ImageFormat;
use tracing::{debug, info, warn};

use crate::catalog::{PriceListParser, align_page};
use crate::error::{PdfError, Result};
use crate::models::config::{AlignmentPolicy, PdfConfig, PricexlConfig};
use crate::models::record::Record;
use crate::pdf::PdfProcessor;

/// Number of pages scanned out of `page_count`; a cap of 0 means no cap.
pub fn page_limit(page_count: usize, max_pages: usize) -> usize {
    if max_pages == 0 {
        page_count
    } else {
        page_count.min(max_pages)
    }
}

/// Outcome of scanning one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageScan {
    /// Zero-based page index.
    pub page_index: usize,
    /// Records parsed from the page, images already attached.
    pub records: Vec<Record>,
    /// One slot per drawn image, in drawing order; `None` where the image
    /// could not be decoded.
    pub images: Vec<Option<PathBuf>>,
}

impl PageScan {
    /// Number of images written to disk.
    pub fn saved(&self) -> usize {
        self.images.iter().flatten().count()
    }

    /// Number of records that received an image.
    pub fn matched(&self) -> usize {
        self.records.iter().filter(|r| r.image_path.is_some()).count()
    }
}

/// Walks the pages of a loaded document.
pub struct PageScanner<'a, P: PdfProcessor> {
    pdf: &'a P,
    parser: PriceListParser,
    images_dir: PathBuf,
    max_pages: usize,
    alignment: AlignmentPolicy,
}

impl<'a, P: PdfProcessor> PageScanner<'a, P> {
    pub fn new(pdf: &'a P, parser: PriceListParser, images_dir: impl Into<PathBuf>) -> Self {
        Self {
            pdf,
            parser,
            images_dir: images_dir.into(),
            max_pages: PdfConfig::default().max_pages,
            alignment: AlignmentPolicy::default(),
        }
    }

    /// Build a scanner from configuration.
    pub fn from_config(
        pdf: &'a P,
        config: &PricexlConfig,
        images_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let parser = PriceListParser::from_config(config)?;
        Ok(Self::new(pdf, parser, images_dir)
            .with_max_pages(config.pdf.max_pages)
            .with_alignment(config.extraction.alignment))
    }

    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    pub fn with_alignment(mut self, alignment: AlignmentPolicy) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// Pages that will be scanned: the document length, capped.
    pub fn pages_to_scan(&self) -> usize {
        page_limit(self.pdf.page_count() as usize, self.max_pages)
    }

    /// Records of one page, without touching its images.
    pub fn scan_text(&self, page_index: usize) -> Result<Vec<Record>> {
        let lines = self.pdf.page_lines(page_index as u32 + 1)?;
        debug!("Page {}: {} text lines", page_index, lines.len());
        Ok(self.parser.parse_page(&lines))
    }

    /// Records of every scanned page, text only.
    pub fn scan_text_all(&self) -> Result<Vec<Record>> {
        let mut records = Vec::new();
        for page_index in 0..self.pages_to_scan() {
            records.extend(self.scan_text(page_index)?);
        }
        Ok(records)
    }

    /// Save a page's images and return one slot per image in drawing order.
    ///
    /// An image that cannot be decoded fails the page under the strict
    /// policy; under the lenient one its slot stays empty so the images
    /// after it keep their positions. Existing files are overwritten.
    pub fn save_images(&self, page_index: usize) -> Result<Vec<Option<PathBuf>>> {
        let page = page_index as u32 + 1;
        let mut paths = Vec::new();

        for image in self.pdf.page_images(page)? {
            let pixels = match image.image {
                Ok(pixels) => pixels,
                Err(reason) => {
                    let err = PdfError::UndecodableImage {
                        page,
                        name: image.name,
                        reason,
                    };
                    match self.alignment {
                        AlignmentPolicy::Strict => return Err(err.into()),
                        AlignmentPolicy::Lenient => {
                            warn!("{}, its row gets no image", err);
                            paths.push(None);
                            continue;
                        }
                    }
                }
            };

            let path = self
                .images_dir
                .join(format!("image_{}_{}.png", page_index, image.index));
            pixels.to_rgb8().save_with_format(&path, ImageFormat::Png)?;
            debug!("Saved {} ({}) to {}", image.name, image.index, path.display());
            paths.push(Some(path));
        }

        Ok(paths)
    }

    /// Scan one page: parse records, save images and pair them up.
    ///
    /// The images directory must already exist.
    pub fn scan_page(&self, page_index: usize) -> Result<PageScan> {
        let mut records = self.scan_text(page_index)?;
        let images = self.save_images(page_index)?;
        let matched = align_page(page_index, &mut records, images.clone(), self.alignment)?;

        info!(
            "Page {}: {} records, {} images, {} matched",
            page_index,
            records.len(),
            images.iter().flatten().count(),
            matched
        );
        Ok(PageScan {
            page_index,
            records,
            images,
        })
    }

    /// Scan every page, calling `on_page` after each one.
    pub fn scan_all<F>(&self, mut on_page: F) -> Result<Vec<Record>>
    where
        F: FnMut(&PageScan),
    {
        fs::create_dir_all(&self.images_dir)?;

        let mut records = Vec::new();
        for page_index in 0..self.pages_to_scan() {
            let scan = self.scan_page(page_index)?;
            on_page(&scan);
            records.extend(scan.records);
        }
        Ok(records)
    }
}
