//! XLSX output: one worksheet of price rows with pictures in the Image column.

pub mod embed;
mod writer;
mod xml;

pub use embed::{CellAnchor, EmbeddedImage, ImageEmbedder};
pub use writer::{HEADERS, SheetWriter, WriteSummary, column_letter};
