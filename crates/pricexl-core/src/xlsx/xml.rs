//! Small writer for XLSX part documents.

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::SheetError;

pub(crate) const NS_MAIN: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
pub(crate) const NS_REL: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_PKG_REL: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// One XML part being written, e.g. `xl/workbook.xml`.
pub(crate) struct XmlPart {
    part: &'static str,
    writer: Writer<Vec<u8>>,
}

impl XmlPart {
    pub fn new(part: &'static str) -> Result<Self, SheetError> {
        let mut xml = Self {
            part,
            writer: Writer::new(Vec::new()),
        };
        xml.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(xml)
    }

    /// Part name inside the archive.
    pub fn name(&self) -> &'static str {
        self.part
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), SheetError> {
        let part = self.part;
        self.writer.write_event(event).map_err(|e| SheetError::Xml {
            part,
            reason: e.to_string(),
        })
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SheetError> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Start(tag))
    }

    pub fn end(&mut self, name: &str) -> Result<(), SheetError> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), SheetError> {
        let tag = BytesStart::new(name).with_attributes(attrs.iter().copied());
        self.write(Event::Empty(tag))
    }

    /// `<name attrs>text</name>`, with `text` escaped.
    pub fn text(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<(), SheetError> {
        self.start(name, attrs)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    /// A package relationships part.
    pub fn relationships(
        part: &'static str,
        rels: &[(&str, &str, &str)],
    ) -> Result<Self, SheetError> {
        let mut xml = Self::new(part)?;
        xml.start("Relationships", &[("xmlns", NS_PKG_REL)])?;
        for &(id, kind, target) in rels {
            xml.empty(
                "Relationship",
                &[("Id", id), ("Type", kind), ("Target", target)],
            )?;
        }
        xml.end("Relationships")?;
        Ok(xml)
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}
