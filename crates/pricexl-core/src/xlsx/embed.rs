//! Anchoring product images in the Image column.
//!
//! Every row with an image gets a picture inside the drawing part, anchored
//! to its Image cell with `twoCellAnchor` so it moves and sizes with the
//! cell. The picture is centered in a fixed placeholder, shrunk to the cell
//! when the placeholder does not fit.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use super::xml::{NS_REL, XmlPart};
use crate::error::SheetError;
use crate::models::config::OutputConfig;
use crate::models::record::Row;

/// Zero-based index of the Image column (E).
pub(crate) const IMAGE_COLUMN: u32 = 4;

/// Zero-based index of the Image Path column (D).
pub(crate) const PATH_COLUMN: usize = 3;

/// Height Excel gives rows without a custom height.
pub(crate) const DEFAULT_ROW_HEIGHT: f64 = 15.0;

const EMU_PER_POINT: f64 = 12_700.0;

/// Maximum digit width of the default font (Calibri 11), in pixels.
const MAX_DIGIT_WIDTH: f64 = 7.0;

const NS_XDR: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";
const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";

/// Rendered width in points of a column `chars` characters wide.
pub fn column_width_points(chars: f64) -> f64 {
    let pixels =
        ((256.0 * chars + (128.0 / MAX_DIGIT_WIDTH).trunc()) / 256.0 * MAX_DIGIT_WIDTH).trunc();
    pixels * 0.75
}

fn emu(points: f64) -> String {
    ((points * EMU_PER_POINT).round() as i64).to_string()
}

/// Where a picture sits inside its cell, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellAnchor {
    /// Zero-based sheet row.
    pub row: u32,
    /// Zero-based sheet column.
    pub col: u32,
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl CellAnchor {
    /// Center a `width` x `height` picture in a cell, clamped to the cell.
    pub fn centered(row: u32, col: u32, cell: (f64, f64), width: f64, height: f64) -> Self {
        let (cell_width, cell_height) = cell;
        let width = width.min(cell_width).max(0.0);
        let height = height.min(cell_height).max(0.0);
        Self {
            row,
            col,
            offset_x: (cell_width - width) / 2.0,
            offset_y: (cell_height - height) / 2.0,
            width,
            height,
        }
    }
}

/// An image file about to be stored in the workbook.
#[derive(Debug, Clone)]
pub struct EmbeddedImage {
    /// File name under `xl/media/`.
    pub media_name: String,
    /// PNG bytes.
    pub data: Vec<u8>,
    /// Cell placement.
    pub anchor: CellAnchor,
    /// Where the image was read from.
    pub source: PathBuf,
}

/// Builds the drawing part for a sheet's images.
pub struct ImageEmbedder<'a> {
    output: &'a OutputConfig,
}

impl<'a> ImageEmbedder<'a> {
    pub fn new(output: &'a OutputConfig) -> Self {
        Self { output }
    }

    fn cell_size(&self) -> (f64, f64) {
        (
            column_width_points(self.output.column_widths[IMAGE_COLUMN as usize]),
            self.output.row_height,
        )
    }

    /// Read every row's image and anchor it next to the row.
    ///
    /// Data rows start below the header, so row `i` lands on sheet row `i + 1`.
    pub fn collect(&self, rows: &[Row]) -> Result<Vec<EmbeddedImage>, SheetError> {
        let mut images = Vec::new();

        for (i, row) in rows.iter().enumerate() {
            let Some(path) = &row.image_path else {
                continue;
            };
            if !path.is_file() {
                return Err(SheetError::MissingImage(path.clone()));
            }

            images.push(EmbeddedImage {
                media_name: format!("image{}.png", images.len() + 1),
                data: fs::read(path)?,
                anchor: CellAnchor::centered(
                    i as u32 + 1,
                    IMAGE_COLUMN,
                    self.cell_size(),
                    self.output.image_width,
                    self.output.image_height,
                ),
                source: path.clone(),
            });
        }

        debug!("Embedding {} images", images.len());
        Ok(images)
    }

    /// Absolute top-left corner of an anchor, in points.
    fn absolute_origin(&self, anchor: &CellAnchor) -> (f64, f64) {
        let x: f64 = (0..anchor.col as usize)
            .filter(|&c| !(self.output.hide_path_column && c == PATH_COLUMN))
            .map(|c| column_width_points(self.output.column_widths.get(c).copied().unwrap_or(0.0)))
            .sum();
        let y = if anchor.row == 0 {
            0.0
        } else {
            DEFAULT_ROW_HEIGHT + (anchor.row - 1) as f64 * self.output.row_height
        };
        (x + anchor.offset_x, y + anchor.offset_y)
    }

    fn write_marker(
        xml: &mut XmlPart,
        tag: &str,
        anchor: &CellAnchor,
        x: f64,
        y: f64,
    ) -> Result<(), SheetError> {
        xml.start(tag, &[])?;
        xml.text("xdr:col", &[], &anchor.col.to_string())?;
        xml.text("xdr:colOff", &[], &emu(x))?;
        xml.text("xdr:row", &[], &anchor.row.to_string())?;
        xml.text("xdr:rowOff", &[], &emu(y))?;
        xml.end(tag)
    }

    /// `xl/drawings/drawing1.xml`; picture `i` uses relationship `rId{i+1}`.
    pub(crate) fn drawing(&self, images: &[EmbeddedImage]) -> Result<XmlPart, SheetError> {
        let mut xml = XmlPart::new("xl/drawings/drawing1.xml")?;
        xml.start("xdr:wsDr", &[("xmlns:xdr", NS_XDR), ("xmlns:a", NS_A)])?;

        for (i, image) in images.iter().enumerate() {
            let a = &image.anchor;
            let id = (i + 2).to_string();
            let name = format!("Picture {}", i + 1);
            let descr = image
                .source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let rel = format!("rId{}", i + 1);
            let (abs_x, abs_y) = self.absolute_origin(a);

            xml.start("xdr:twoCellAnchor", &[("editAs", "twoCell")])?;
            Self::write_marker(&mut xml, "xdr:from", a, a.offset_x, a.offset_y)?;
            Self::write_marker(&mut xml, "xdr:to", a, a.offset_x + a.width, a.offset_y + a.height)?;

            xml.start("xdr:pic", &[])?;
            xml.start("xdr:nvPicPr", &[])?;
            xml.empty(
                "xdr:cNvPr",
                &[("id", id.as_str()), ("name", name.as_str()), ("descr", descr.as_str())],
            )?;
            xml.start("xdr:cNvPicPr", &[])?;
            xml.empty("a:picLocks", &[("noChangeAspect", "1")])?;
            xml.end("xdr:cNvPicPr")?;
            xml.end("xdr:nvPicPr")?;

            xml.start("xdr:blipFill", &[])?;
            xml.empty("a:blip", &[("xmlns:r", NS_REL), ("r:embed", rel.as_str())])?;
            xml.start("a:stretch", &[])?;
            xml.empty("a:fillRect", &[])?;
            xml.end("a:stretch")?;
            xml.end("xdr:blipFill")?;

            xml.start("xdr:spPr", &[])?;
            xml.start("a:xfrm", &[])?;
            let (off_x, off_y) = (emu(abs_x), emu(abs_y));
            let (ext_x, ext_y) = (emu(a.width), emu(a.height));
            xml.empty("a:off", &[("x", off_x.as_str()), ("y", off_y.as_str())])?;
            xml.empty("a:ext", &[("cx", ext_x.as_str()), ("cy", ext_y.as_str())])?;
            xml.end("a:xfrm")?;
            xml.start("a:prstGeom", &[("prst", "rect")])?;
            xml.empty("a:avLst", &[])?;
            xml.end("a:prstGeom")?;
            xml.end("xdr:spPr")?;
            xml.end("xdr:pic")?;

            xml.empty("xdr:clientData", &[])?;
            xml.end("xdr:twoCellAnchor")?;
        }

        xml.end("xdr:wsDr")?;
        Ok(xml)
    }

    /// `xl/drawings/_rels/drawing1.xml.rels`
    pub(crate) fn drawing_rels(&self, images: &[EmbeddedImage]) -> Result<XmlPart, SheetError> {
        let ids: Vec<String> = (1..=images.len()).map(|i| format!("rId{}", i)).collect();
        let targets: Vec<String> = images
            .iter()
            .map(|img| format!("../media/{}", img.media_name))
            .collect();
        let rels: Vec<(&str, &str, &str)> = ids
            .iter()
            .zip(&targets)
            .map(|(id, target)| (id.as_str(), REL_IMAGE, target.as_str()))
            .collect();

        XmlPart::relationships("xl/drawings/_rels/drawing1.xml.rels", &rels)
    }
}
