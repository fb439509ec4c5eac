//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PricexlError, Result};

/// Main configuration for the pricexl pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PricexlConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Record extraction configuration.
    pub extraction: ExtractionConfig,

    /// Spreadsheet output configuration.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,

    /// Non-blank lines dropped from the top of every page.
    pub header_lines: usize,

    /// Non-blank lines dropped from the bottom of every page.
    pub footer_lines: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 20,
            header_lines: 1,
            footer_lines: 1,
        }
    }
}

/// How surplus page images are treated when pairing them with records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlignmentPolicy {
    /// More images than records on a page is an error.
    #[default]
    Strict,
    /// Surplus images are dropped with a warning.
    Lenient,
}

/// Record extraction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Currency prefix in front of every price.
    pub currency_symbol: String,

    /// Substrings removed from product names before writing.
    pub artifacts: Vec<String>,

    /// Image/record pairing policy.
    pub alignment: AlignmentPolicy,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "S/.".to_string(),
            artifacts: vec!["(cid:1)(cid:2)".to_string()],
            alignment: AlignmentPolicy::Strict,
        }
    }
}

/// Spreadsheet output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for extracted images (default: `images` next to the workbook).
    pub images_dir: Option<PathBuf>,

    /// Name of the single worksheet.
    pub sheet_name: String,

    /// Widths of columns A to E, in characters.
    pub column_widths: [f64; 5],

    /// Height of every data row, in points.
    pub row_height: f64,

    /// Width of the embedded image placeholder, in points.
    pub image_width: f64,

    /// Height of the embedded image placeholder, in points.
    pub image_height: f64,

    /// Freeze the header row.
    pub freeze_header: bool,

    /// Hide the column holding image file paths.
    pub hide_path_column: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            images_dir: None,
            sheet_name: "Sheet1".to_string(),
            column_widths: [60.0, 15.0, 15.0, 50.0, 15.0],
            row_height: 50.0,
            image_width: 60.0,
            image_height: 40.0,
            freeze_header: true,
            hide_path_column: true,
        }
    }
}

impl PricexlConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PricexlError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| PricexlError::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Images directory for a workbook written to `workbook`.
    pub fn images_dir_for(&self, workbook: &Path) -> PathBuf {
        match &self.output.images_dir {
            Some(dir) => dir.clone(),
            None => workbook
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join("images"),
        }
    }
}
