//! XLSX workbook writer.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::embed::{DEFAULT_ROW_HEIGHT, EmbeddedImage, ImageEmbedder, PATH_COLUMN};
use super::xml::{NS_MAIN, NS_REL, XmlPart};
use crate::error::SheetError;
use crate::models::config::{OutputConfig, PricexlConfig};
use crate::models::record::{Record, Row};

/// Column headers, A to E.
pub const HEADERS: [&str; 5] = ["Product", "Previous Price", "Current Price", "Image Path", "Image"];

// Cell format indices in styles.xml
const STYLE_HEADER: &str = "1";
const STYLE_TEXT: &str = "2";
const STYLE_PRICE: &str = "3";

const CT_RELS: &str = "application/vnd.openxmlformats-package.relationships+xml";
const CT_WORKBOOK: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
const CT_SHEET: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
const CT_DRAWING: &str = "application/vnd.openxmlformats-officedocument.drawing+xml";
const CT_CORE: &str = "application/vnd.openxmlformats-package.core-properties+xml";

const REL_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_SHEET: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
const REL_STYLES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
const REL_DRAWING: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";

/// What ended up in a written workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteSummary {
    pub rows: usize,
    pub images: usize,
}

/// Spreadsheet column name for a zero-based index (0 = A).
pub fn column_letter(mut col: usize) -> String {
    let mut name = Vec::new();
    loop {
        name.push(b'A' + (col % 26) as u8);
        if col < 26 {
            break;
        }
        col = col / 26 - 1;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}

fn validate_sheet_name(name: &str) -> Result<(), SheetError> {
    let invalid = name.is_empty()
        || name.chars().count() > 31
        || name.contains(['[', ']', ':', '*', '?', '/', '\\'])
        || name.starts_with('\'')
        || name.ends_with('\'');
    if invalid {
        return Err(SheetError::InvalidSheetName(name.to_string()));
    }
    Ok(())
}

/// Writes records to a single-sheet workbook with embedded images.
#[derive(Debug, Clone, Default)]
pub struct SheetWriter {
    output: OutputConfig,
    artifacts: Vec<String>,
}

impl SheetWriter {
    /// Create a writer with default layout and no artifact stripping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a writer from configuration.
    pub fn from_config(config: &PricexlConfig) -> Self {
        Self {
            output: config.output.clone(),
            artifacts: config.extraction.artifacts.clone(),
        }
    }

    /// Set the substrings removed from product names.
    pub fn with_artifacts(mut self, artifacts: Vec<String>) -> Self {
        self.artifacts = artifacts;
        self
    }

    /// Clean records into rows.
    pub fn rows(&self, records: &[Record]) -> Vec<Row> {
        records
            .iter()
            .map(|r| Row::from_record(r, &self.artifacts))
            .collect()
    }

    /// Clean and write records.
    pub fn write_records(&self, records: &[Record], path: &Path) -> Result<WriteSummary, SheetError> {
        self.write(&self.rows(records), path)
    }

    /// Write rows to `path`, replacing any existing file.
    pub fn write(&self, rows: &[Row], path: &Path) -> Result<WriteSummary, SheetError> {
        validate_sheet_name(&self.output.sheet_name)?;

        let embedder = ImageEmbedder::new(&self.output);
        let images = embedder.collect(rows)?;
        let has_images = !images.is_empty();

        let mut parts = vec![
            self.content_types(has_images)?,
            XmlPart::relationships(
                "_rels/.rels",
                &[
                    ("rId1", REL_DOCUMENT, "xl/workbook.xml"),
                    ("rId2", REL_CORE, "docProps/core.xml"),
                ],
            )?,
            self.core_properties()?,
            self.workbook()?,
            XmlPart::relationships(
                "xl/_rels/workbook.xml.rels",
                &[
                    ("rId1", REL_SHEET, "worksheets/sheet1.xml"),
                    ("rId2", REL_STYLES, "styles.xml"),
                ],
            )?,
            self.styles()?,
            self.sheet(rows, has_images)?,
        ];
        if has_images {
            parts.push(XmlPart::relationships(
                "xl/worksheets/_rels/sheet1.xml.rels",
                &[("rId1", REL_DRAWING, "../drawings/drawing1.xml")],
            )?);
            parts.push(embedder.drawing(&images)?);
            parts.push(embedder.drawing_rels(&images)?);
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));

        let deflated = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for part in parts {
            let name = part.name();
            zip.start_file(name, deflated)?;
            zip.write_all(&part.finish())?;
            debug!("Wrote part {}", name);
        }

        // PNG data is already compressed
        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        for EmbeddedImage { media_name, data, .. } in &images {
            zip.start_file(format!("xl/media/{}", media_name), stored)?;
            zip.write_all(data)?;
        }

        zip.finish()?.flush()?;

        info!(
            "Wrote {} rows and {} images to {}",
            rows.len(),
            images.len(),
            path.display()
        );
        Ok(WriteSummary {
            rows: rows.len(),
            images: images.len(),
        })
    }

    fn content_types(&self, has_images: bool) -> Result<XmlPart, SheetError> {
        let mut xml = XmlPart::new("[Content_Types].xml")?;
        xml.start(
            "Types",
            &[("xmlns", "http://schemas.openxmlformats.org/package/2006/content-types")],
        )?;
        xml.empty("Default", &[("Extension", "rels"), ("ContentType", CT_RELS)])?;
        xml.empty("Default", &[("Extension", "xml"), ("ContentType", "application/xml")])?;
        if has_images {
            xml.empty("Default", &[("Extension", "png"), ("ContentType", "image/png")])?;
        }

        let mut overrides = vec![
            ("/xl/workbook.xml", CT_WORKBOOK),
            ("/xl/worksheets/sheet1.xml", CT_SHEET),
            ("/xl/styles.xml", CT_STYLES),
            ("/docProps/core.xml", CT_CORE),
        ];
        if has_images {
            overrides.push(("/xl/drawings/drawing1.xml", CT_DRAWING));
        }
        for (part, content_type) in overrides {
            xml.empty("Override", &[("PartName", part), ("ContentType", content_type)])?;
        }

        xml.end("Types")?;
        Ok(xml)
    }

    fn core_properties(&self) -> Result<XmlPart, SheetError> {
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

        let mut xml = XmlPart::new("docProps/core.xml")?;
        xml.start(
            "cp:coreProperties",
            &[
                (
                    "xmlns:cp",
                    "http://schemas.openxmlformats.org/package/2006/metadata/core-properties",
                ),
                ("xmlns:dc", "http://purl.org/dc/elements/1.1/"),
                ("xmlns:dcterms", "http://purl.org/dc/terms/"),
                ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
            ],
        )?;
        xml.text("dc:creator", &[], "pricexl")?;
        xml.text("dcterms:created", &[("xsi:type", "dcterms:W3CDTF")], &now)?;
        xml.text("dcterms:modified", &[("xsi:type", "dcterms:W3CDTF")], &now)?;
        xml.end("cp:coreProperties")?;
        Ok(xml)
    }

    fn workbook(&self) -> Result<XmlPart, SheetError> {
        let mut xml = XmlPart::new("xl/workbook.xml")?;
        xml.start("workbook", &[("xmlns", NS_MAIN), ("xmlns:r", NS_REL)])?;
        xml.start("bookViews", &[])?;
        xml.empty("workbookView", &[("activeTab", "0")])?;
        xml.end("bookViews")?;
        xml.start("sheets", &[])?;
        xml.empty(
            "sheet",
            &[
                ("name", self.output.sheet_name.as_str()),
                ("sheetId", "1"),
                ("r:id", "rId1"),
            ],
        )?;
        xml.end("sheets")?;
        xml.end("workbook")?;
        Ok(xml)
    }

    fn styles(&self) -> Result<XmlPart, SheetError> {
        let mut xml = XmlPart::new("xl/styles.xml")?;
        xml.start("styleSheet", &[("xmlns", NS_MAIN)])?;

        xml.start("fonts", &[("count", "2")])?;
        for bold in [false, true] {
            xml.start("font", &[])?;
            if bold {
                xml.empty("b", &[])?;
            }
            xml.empty("sz", &[("val", "11")])?;
            xml.empty("name", &[("val", "Calibri")])?;
            xml.empty("family", &[("val", "2")])?;
            xml.end("font")?;
        }
        xml.end("fonts")?;

        xml.start("fills", &[("count", "2")])?;
        for pattern in ["none", "gray125"] {
            xml.start("fill", &[])?;
            xml.empty("patternFill", &[("patternType", pattern)])?;
            xml.end("fill")?;
        }
        xml.end("fills")?;

        xml.start("borders", &[("count", "1")])?;
        xml.start("border", &[])?;
        for side in ["left", "right", "top", "bottom", "diagonal"] {
            xml.empty(side, &[])?;
        }
        xml.end("border")?;
        xml.end("borders")?;

        xml.start("cellStyleXfs", &[("count", "1")])?;
        xml.empty(
            "xf",
            &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0")],
        )?;
        xml.end("cellStyleXfs")?;

        // 0 default, 1 header, 2 text, 3 price ("0.00" is built-in format 2)
        xml.start("cellXfs", &[("count", "4")])?;
        xml.empty(
            "xf",
            &[("numFmtId", "0"), ("fontId", "0"), ("fillId", "0"), ("borderId", "0"), ("xfId", "0")],
        )?;
        xml.empty(
            "xf",
            &[
                ("numFmtId", "0"),
                ("fontId", "1"),
                ("fillId", "0"),
                ("borderId", "0"),
                ("xfId", "0"),
                ("applyFont", "1"),
            ],
        )?;
        for num_fmt in ["0", "2"] {
            xml.start(
                "xf",
                &[
                    ("numFmtId", num_fmt),
                    ("fontId", "0"),
                    ("fillId", "0"),
                    ("borderId", "0"),
                    ("xfId", "0"),
                    ("applyNumberFormat", "1"),
                    ("applyAlignment", "1"),
                ],
            )?;
            xml.empty("alignment", &[("vertical", "center")])?;
            xml.end("xf")?;
        }
        xml.end("cellXfs")?;

        xml.start("cellStyles", &[("count", "1")])?;
        xml.empty("cellStyle", &[("name", "Normal"), ("xfId", "0"), ("builtinId", "0")])?;
        xml.end("cellStyles")?;

        xml.end("styleSheet")?;
        Ok(xml)
    }

    fn inline_string(xml: &mut XmlPart, cell: &str, style: &str, text: &str) -> Result<(), SheetError> {
        xml.start("c", &[("r", cell), ("s", style), ("t", "inlineStr")])?;
        xml.start("is", &[])?;
        xml.text("t", &[], text)?;
        xml.end("is")?;
        xml.end("c")
    }

    fn sheet(&self, rows: &[Row], has_drawing: bool) -> Result<XmlPart, SheetError> {
        let out = &self.output;
        let mut xml = XmlPart::new("xl/worksheets/sheet1.xml")?;
        xml.start("worksheet", &[("xmlns", NS_MAIN), ("xmlns:r", NS_REL)])?;

        let last = format!("A1:{}{}", column_letter(HEADERS.len() - 1), rows.len() + 1);
        xml.empty("dimension", &[("ref", last.as_str())])?;

        xml.start("sheetViews", &[])?;
        if out.freeze_header {
            xml.start("sheetView", &[("tabSelected", "1"), ("workbookViewId", "0")])?;
            xml.empty(
                "pane",
                &[
                    ("ySplit", "1"),
                    ("topLeftCell", "A2"),
                    ("activePane", "bottomLeft"),
                    ("state", "frozen"),
                ],
            )?;
            xml.empty(
                "selection",
                &[("pane", "bottomLeft"), ("activeCell", "A2"), ("sqref", "A2")],
            )?;
            xml.end("sheetView")?;
        } else {
            xml.empty("sheetView", &[("tabSelected", "1"), ("workbookViewId", "0")])?;
        }
        xml.end("sheetViews")?;

        let default_height = DEFAULT_ROW_HEIGHT.to_string();
        xml.empty("sheetFormatPr", &[("defaultRowHeight", default_height.as_str())])?;

        xml.start("cols", &[])?;
        for (i, width) in out.column_widths.iter().enumerate() {
            let index = (i + 1).to_string();
            let width = width.to_string();
            let mut attrs = vec![
                ("min", index.as_str()),
                ("max", index.as_str()),
                ("width", width.as_str()),
                ("customWidth", "1"),
            ];
            if out.hide_path_column && i == PATH_COLUMN {
                attrs.push(("hidden", "1"));
            }
            xml.empty("col", &attrs)?;
        }
        xml.end("cols")?;

        xml.start("sheetData", &[])?;

        xml.start("row", &[("r", "1")])?;
        for (col, header) in HEADERS.iter().enumerate() {
            let cell = format!("{}1", column_letter(col));
            Self::inline_string(&mut xml, &cell, STYLE_HEADER, header)?;
        }
        xml.end("row")?;

        let height = out.row_height.to_string();
        for (i, row) in rows.iter().enumerate() {
            let r = (i + 2).to_string();
            xml.start(
                "row",
                &[("r", r.as_str()), ("ht", height.as_str()), ("customHeight", "1")],
            )?;

            if !row.product.is_empty() {
                Self::inline_string(&mut xml, &format!("A{}", r), STYLE_TEXT, &row.product)?;
            }
            for (col, price) in [("B", row.previous_price), ("C", row.current_price)] {
                // Missing prices stay empty cells
                if let Some(price) = price {
                    let cell = format!("{}{}", col, r);
                    xml.start("c", &[("r", cell.as_str()), ("s", STYLE_PRICE)])?;
                    xml.text("v", &[], &price.to_string())?;
                    xml.end("c")?;
                }
            }
            if let Some(path) = &row.image_path {
                let text = path.display().to_string();
                Self::inline_string(&mut xml, &format!("D{}", r), STYLE_TEXT, &text)?;
            }

            xml.end("row")?;
        }
        xml.end("sheetData")?;

        xml.empty(
            "pageMargins",
            &[
                ("left", "0.7"),
                ("right", "0.7"),
                ("top", "0.75"),
                ("bottom", "0.75"),
                ("header", "0.3"),
                ("footer", "0.3"),
            ],
        )?;
        if has_drawing {
            xml.empty("drawing", &[("r:id", "rId1")])?;
        }

        xml.end("worksheet")?;
        Ok(xml)
    }
}
