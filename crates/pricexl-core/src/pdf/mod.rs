//! PDF processing module.

mod extractor;
mod placement;

#[cfg(test)]
pub(crate) mod testing;

pub use extractor::{Decoded, PageImage, PdfExtractor};

use crate::error::PdfError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, PdfError>;

/// Trait for PDF processing implementations.
///
/// Pages are numbered from 1.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Text lines of a page, top to bottom.
    fn page_lines(&self, page: u32) -> Result<Vec<String>>;

    /// Images painted on a page, in drawing order.
    ///
    /// Every placement gets an entry, including those whose pixels could
    /// not be decoded, so positions stay aligned with the page layout.
    fn page_images(&self, page: u32) -> Result<Vec<PageImage>>;
}
