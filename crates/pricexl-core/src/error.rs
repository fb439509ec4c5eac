//! Error types for the pricexl-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the pricexl library.
#[derive(Error, Debug)]
pub enum PricexlError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Record extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Image/record alignment error.
    #[error("alignment error: {0}")]
    Alignment(#[from] AlignmentError),

    /// Spreadsheet generation error.
    #[error("spreadsheet error: {0}")]
    Sheet(#[from] SheetError),

    /// Image processing error.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed or written.
    #[error("configuration error in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// Failed to read the page content stream.
    #[error("failed to read content of page {page}: {reason}")]
    Content { page: u32, reason: String },

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),

    /// A drawn image could not be decoded, so its row cannot be paired.
    #[error("cannot decode image {name} on page {page}: {reason}")]
    UndecodableImage {
        page: u32,
        name: String,
        reason: String,
    },
}

/// Errors related to record extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// The row pattern could not be built for the configured currency.
    #[error("invalid row pattern for currency {currency:?}: {reason}")]
    Pattern { currency: String, reason: String },
}

/// Errors raised when pairing page images with page records.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum AlignmentError {
    /// A page holds more images than parsed records.
    #[error("page {page} has {images} images but only {records} records")]
    SurplusImages {
        page: usize,
        images: usize,
        records: usize,
    },
}

/// Errors related to XLSX generation.
#[derive(Error, Debug)]
pub enum SheetError {
    /// Writing a part document failed.
    #[error("failed to write {part}: {reason}")]
    Xml { part: &'static str, reason: String },

    /// Writing the archive failed.
    #[error("failed to write archive: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The worksheet name is not accepted by spreadsheet applications.
    #[error("invalid sheet name {0:?}")]
    InvalidSheetName(String),

    /// A row references an image that is not on disk.
    #[error("image file not found: {}", .0.display())]
    MissingImage(PathBuf),

    /// Archive I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the pricexl library.
pub type Result<T> = std::result::Result<T, PricexlError>;
