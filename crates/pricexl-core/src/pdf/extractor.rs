//! PDF text and image extraction using lopdf and pdf-extract.

use image::{DynamicImage, RgbImage};
use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, trace, warn};

use super::placement::{Matrix, Placement, collect_placements};
use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF content extractor using lopdf.
#[derive(Debug)]
pub struct PdfExtractor {
    document: Option<Document>,
    /// Per-page text from pdf-extract; empty when its page split is unusable.
    page_texts: Vec<String>,
}

/// Pixels of a placement, or the reason they could not be decoded.
pub type Decoded = std::result::Result<DynamicImage, String>;

/// An image painted on a page.
#[derive(Debug, Clone)]
pub struct PageImage {
    /// Position among the page's image placements (0-based).
    pub index: usize,
    /// XObject resource name.
    pub name: String,
    pub image: Decoded,
}

/// Colour spaces the raw sample decoder understands.
#[derive(Debug, Clone, PartialEq)]
enum ColorSpace {
    Gray,
    Rgb,
    Cmyk,
    Indexed { base: Box<ColorSpace>, lookup: Vec<u8> },
}

impl ColorSpace {
    fn components(&self) -> usize {
        match self {
            Self::Gray | Self::Indexed { .. } => 1,
            Self::Rgb => 3,
            Self::Cmyk => 4,
        }
    }

    fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"DeviceRGB" | b"RGB" | b"CalRGB" => Some(Self::Rgb),
            b"DeviceGray" | b"G" | b"CalGray" => Some(Self::Gray),
            b"DeviceCMYK" | b"CMYK" => Some(Self::Cmyk),
            _ => None,
        }
    }

    /// Convert one pixel of full-range 8-bit component values to RGB.
    fn to_rgb(&self, values: &[u8]) -> [u8; 3] {
        match self {
            Self::Gray => [values[0]; 3],
            Self::Rgb => [values[0], values[1], values[2]],
            Self::Cmyk => {
                let k = 255 - values[3] as u16;
                let channel = |c: u8| ((255 - c as u16) * k / 255) as u8;
                [channel(values[0]), channel(values[1]), channel(values[2])]
            }
            Self::Indexed { base, lookup } => {
                let n = base.components();
                let start = values[0] as usize * n;
                match lookup.get(start..start + n) {
                    Some(entry) => base.to_rgb(entry),
                    None => [0; 3],
                }
            }
        }
    }
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            page_texts: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or(PdfError::Parse("No document loaded".to_string()))
    }

    /// Get resources dictionary for a page or page-tree node, handling inheritance
    fn resources(&self, doc: &Document, node_id: ObjectId) -> Option<Dictionary> {
        let node = doc.get_object(node_id).ok()?;
        if let Object::Dictionary(dict) = node {
            // First check if Resources is directly on the node
            if let Ok(resources) = dict.get(b"Resources") {
                if let Ok((_, Object::Dictionary(res_dict))) = doc.dereference(resources) {
                    return Some(res_dict.clone());
                }
            }

            // Continue up the tree
            if let Ok(Object::Reference(parent_id)) = dict.get(b"Parent") {
                return self.resources(doc, *parent_id);
            }
        }
        None
    }

    /// Image placements of a page, in drawing order.
    fn placements(&self, doc: &Document, page: u32) -> Result<Vec<Placement>> {
        let pages = doc.get_pages();
        let page_id = *pages.get(&page).ok_or(PdfError::InvalidPage(page))?;

        let resources = self.resources(doc, page_id).unwrap_or_else(Dictionary::new);
        let content_err = |e: lopdf::Error| PdfError::Content {
            page,
            reason: e.to_string(),
        };
        let raw = doc.get_page_content(page_id).map_err(content_err)?;
        let content = Content::decode(&raw).map_err(content_err)?;

        let mut placements = Vec::new();
        collect_placements(doc, &content, &resources, Matrix::IDENTITY, 0, &mut placements);
        Ok(placements)
    }

    fn decode_placement(&self, doc: &Document, placement: &Placement) -> Decoded {
        match doc.get_object(placement.object_id) {
            Ok(Object::Stream(stream)) => decode_image(doc, stream),
            _ => Err("image object is not a stream".to_string()),
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        let raw_data = if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(PdfError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            decrypted_data
        } else {
            data.to_vec()
        };

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        // pdf-extract panics on some malformed fonts
        let extracted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem(&raw_data)
        }));
        self.page_texts = match extracted {
            Ok(Ok(text)) => {
                let pages = split_text_into_pages(&text);
                if pages.len() == page_count {
                    pages
                } else {
                    debug!(
                        "pdf-extract produced {} page texts for {} pages, using lopdf text",
                        pages.len(), page_count
                    );
                    Vec::new()
                }
            }
            Ok(Err(e)) => {
                warn!("pdf-extract failed ({}), using lopdf text", e);
                Vec::new()
            }
            Err(_) => {
                warn!("pdf-extract panicked, using lopdf text");
                Vec::new()
            }
        };

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn page_lines(&self, page: u32) -> Result<Vec<String>> {
        let doc = self.document()?;
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        let text = match self.page_texts.get(page as usize - 1) {
            Some(text) => text.clone(),
            None => doc
                .extract_text(&[page])
                .map_err(|e| PdfError::TextExtraction(e.to_string()))?,
        };

        Ok(text.lines().map(str::to_string).collect())
    }

    fn page_images(&self, page: u32) -> Result<Vec<PageImage>> {
        let doc = self.document()?;

        let images: Vec<PageImage> = self
            .placements(doc, page)?
            .into_iter()
            .enumerate()
            .map(|(index, placement)| {
                trace!("Image {} painted at {:?}", placement.name, placement.bbox);
                let image = self.decode_placement(doc, &placement);
                if let Err(reason) = &image {
                    debug!("Image {} on page {} not decoded: {}", placement.name, page, reason);
                }
                PageImage {
                    index,
                    name: placement.name,
                    image,
                }
            })
            .collect();

        debug!("Found {} images on page {}", images.len(), page);
        Ok(images)
    }
}

/// pdf-extract separates pages with form feeds.
fn split_text_into_pages(raw_text: &str) -> Vec<String> {
    let mut pages = raw_text
        .split('\u{000C}')
        .map(str::to_string)
        .collect::<Vec<_>>();
    if pages.last().is_some_and(String::is_empty) {
        pages.pop();
    }
    pages
}

fn filter_names(dict: &Dictionary) -> Vec<Vec<u8>> {
    match dict.get(b"Filter") {
        Ok(Object::Name(name)) => vec![name.clone()],
        Ok(Object::Array(arr)) => arr
            .iter()
            .filter_map(|o| o.as_name().ok().map(<[u8]>::to_vec))
            .collect(),
        _ => Vec::new(),
    }
}

fn resolve_color_space(doc: &Document, obj: &Object) -> Option<ColorSpace> {
    let (_, obj) = doc.dereference(obj).ok()?;
    match obj {
        Object::Name(name) => ColorSpace::from_name(name),
        Object::Array(arr) => {
            let family = arr.first()?.as_name().ok()?;
            match family {
                b"ICCBased" => {
                    let (_, profile) = doc.dereference(arr.get(1)?).ok()?;
                    let n = profile.as_stream().ok()?.dict.get(b"N").ok()?.as_i64().ok()?;
                    match n {
                        1 => Some(ColorSpace::Gray),
                        3 => Some(ColorSpace::Rgb),
                        4 => Some(ColorSpace::Cmyk),
                        _ => None,
                    }
                }
                b"Indexed" | b"I" => {
                    let base = resolve_color_space(doc, arr.get(1)?)?;
                    if matches!(base, ColorSpace::Indexed { .. }) {
                        return None;
                    }
                    let (_, lookup) = doc.dereference(arr.get(3)?).ok()?;
                    let lookup = match lookup {
                        Object::String(bytes, _) => bytes.clone(),
                        Object::Stream(s) => s
                            .decompressed_content()
                            .unwrap_or_else(|_| s.content.clone()),
                        _ => return None,
                    };
                    Some(ColorSpace::Indexed {
                        base: Box::new(base),
                        lookup,
                    })
                }
                other => ColorSpace::from_name(other),
            }
        }
        _ => None,
    }
}

/// A positive `/Width` or `/Height`.
fn dimension(dict: &Dictionary, key: &str) -> std::result::Result<u32, String> {
    let value = dict
        .get(key.as_bytes())
        .and_then(|o| o.as_i64())
        .map_err(|_| format!("missing /{}", key))?;
    u32::try_from(value)
        .ok()
        .filter(|&v| v > 0)
        .ok_or_else(|| format!("invalid /{} {}", key, value))
}

/// Decode an image XObject stream.
fn decode_image(doc: &Document, stream: &Stream) -> Decoded {
    let dict = &stream.dict;
    let width = dimension(dict, "Width")?;
    let height = dimension(dict, "Height")?;

    trace!("Found image object: {}x{}", width, height);

    let filters = filter_names(dict);
    match filters.first().map(Vec::as_slice) {
        Some(b"DCTDecode") => {
            // JPEG data - use raw stream content (already compressed)
            trace!("Decoding JPEG image");
            return image::load_from_memory_with_format(&stream.content, image::ImageFormat::Jpeg)
                .map_err(|e| e.to_string());
        }
        Some(b"JPXDecode") | Some(b"CCITTFaxDecode") | Some(b"JBIG2Decode") => {
            return Err(format!(
                "unsupported filter {}",
                String::from_utf8_lossy(&filters[0])
            ));
        }
        _ => {}
    }

    let data = stream
        .decompressed_content()
        .unwrap_or_else(|_| stream.content.clone());

    let is_mask = matches!(dict.get(b"ImageMask"), Ok(Object::Boolean(true)));
    let (color_space, bits) = if is_mask {
        (ColorSpace::Gray, 1)
    } else {
        let color_space = match dict.get(b"ColorSpace") {
            Ok(obj) => resolve_color_space(doc, obj)
                .ok_or_else(|| "unsupported colour space".to_string())?,
            Err(_) => ColorSpace::Rgb,
        };
        let bits = dict
            .get(b"BitsPerComponent")
            .ok()
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(8) as u8;
        (color_space, bits)
    };

    decode_raw(&data, width, height, &color_space, bits)
        .map(DynamicImage::ImageRgb8)
        .ok_or_else(|| {
            format!(
                "cannot unpack {}x{} samples at {} bits from {} bytes",
                width,
                height,
                bits,
                data.len()
            )
        })
}

/// Decode uncompressed samples into an RGB image.
fn decode_raw(
    data: &[u8],
    width: u32,
    height: u32,
    color_space: &ColorSpace,
    bits_per_component: u8,
) -> Option<RgbImage> {
    let components = color_space.components();
    let samples = unpack_samples(data, width as usize, height as usize, components, bits_per_component)?;

    let max = (1u32 << bits_per_component.min(8)) - 1;
    let indexed = matches!(color_space, ColorSpace::Indexed { .. });

    let capacity = (width as usize).checked_mul(height as usize)?.checked_mul(3)?;
    let mut rgb = Vec::with_capacity(capacity);
    let mut pixel = [0u8; 4];
    for chunk in samples.chunks_exact(components) {
        for (slot, &sample) in pixel.iter_mut().zip(chunk) {
            // Indexed samples are table positions, not intensities
            *slot = if indexed || max == 255 {
                sample
            } else {
                (sample as u32 * 255 / max) as u8
            };
        }
        rgb.extend_from_slice(&color_space.to_rgb(&pixel[..components]));
    }

    RgbImage::from_raw(width, height, rgb)
}

/// Split packed rows into one byte per sample. 16-bit samples keep their
/// high byte.
fn unpack_samples(
    data: &[u8],
    width: usize,
    height: usize,
    components: usize,
    bits: u8,
) -> Option<Vec<u8>> {
    let per_row = width.checked_mul(components)?;
    let total = per_row.checked_mul(height)?;
    if total == 0 {
        return None;
    }
    match bits {
        8 => {
            let expected = total;
            if data.len() < expected {
                trace!("Short image data: {} < {}", data.len(), expected);
                return None;
            }
            Some(data[..expected].to_vec())
        }
        16 => {
            let expected = total.checked_mul(2)?;
            if data.len() < expected {
                return None;
            }
            Some(data[..expected].iter().step_by(2).copied().collect())
        }
        1 | 2 | 4 => {
            let bits = bits as usize;
            let row_bytes = per_row.checked_mul(bits)?.div_ceil(8);
            if data.len() < row_bytes.checked_mul(height)? {
                return None;
            }
            let mask = (1u8 << bits) - 1;
            let mut samples = Vec::with_capacity(total);
            for row in data.chunks_exact(row_bytes).take(height) {
                for i in 0..per_row {
                    let bit = i * bits;
                    let shift = 8 - bits - (bit % 8);
                    samples.push((row[bit / 8] >> shift) & mask);
                }
            }
            Some(samples)
        }
        _ => {
            trace!("Unsupported bits per component: {}", bits);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::placement::BBox;
    use super::super::testing::{TestImage, TestPage, catalog_pdf, mixed_catalog};
    use super::*;
    use crate::catalog::PriceListParser;
    use image::Rgb;
    use lopdf::content::Operation;
    use lopdf::dictionary;

    fn name(n: &str) -> Object {
        Object::Name(n.as_bytes().to_vec())
    }

    fn placed(operations: &mut Vec<Operation>, image: &str, m: [i64; 6]) {
        operations.push(Operation::new("q", vec![]));
        operations.push(Operation::new("cm", m.iter().map(|v| Object::Integer(*v)).collect()));
        operations.push(Operation::new("Do", vec![name(image)]));
        operations.push(Operation::new("Q", vec![]));
    }

    /// One page: a red 2x1 RGB image, a 1x2 gray image, and a form that
    /// paints the gray image again.
    fn sample_pdf() -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let red = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 1,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            vec![255, 0, 0, 255, 0, 0],
        ));
        let gray = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 1,
                "Height" => 2,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            vec![0, 255],
        ));

        let mut form_ops = Vec::new();
        placed(&mut form_ops, "Im2", [10, 0, 0, 10, 0, 0]);
        let form = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 100.into(), 100.into()],
                "Matrix" => vec![1.into(), 0.into(), 0.into(), 1.into(), 300.into(), 100.into()],
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im2" => gray },
                },
            },
            Content { operations: form_ops }.encode().unwrap(),
        ));

        let resources_id = doc.add_object(dictionary! {
            "XObject" => dictionary! {
                "Im1" => red,
                "Im2" => gray,
                "Fm1" => form,
            },
        });

        let mut ops = Vec::new();
        placed(&mut ops, "Im1", [60, 0, 0, 40, 100, 700]);
        placed(&mut ops, "Im2", [30, 0, 0, 30, 100, 500]);
        ops.push(Operation::new("Do", vec![name("Fm1")]));
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            Content { operations: ops }.encode().unwrap(),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        });
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        doc.save_to(&mut buf).unwrap();
        buf
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
        assert!(extractor.page_images(1).is_err());
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        assert!(matches!(extractor.load(b"not a pdf"), Err(PdfError::Parse(_))));
    }

    #[test]
    fn test_page_images_in_drawing_order() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&sample_pdf()).unwrap();
        assert_eq!(extractor.page_count(), 1);

        let images = extractor.page_images(1).unwrap();
        let names: Vec<&str> = images.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Im1", "Im2", "Im2"]);
        assert_eq!(images.iter().map(|i| i.index).collect::<Vec<_>>(), vec![0, 1, 2]);

        let red = images[0].image.as_ref().unwrap().to_rgb8();
        assert_eq!(red.dimensions(), (2, 1));
        assert_eq!(red.get_pixel(1, 0), &Rgb([255, 0, 0]));

        let gray = images[1].image.as_ref().unwrap().to_rgb8();
        assert_eq!(gray.dimensions(), (1, 2));
        assert_eq!(gray.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(gray.get_pixel(0, 1), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_placement_areas() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&sample_pdf()).unwrap();
        let doc = extractor.document().unwrap();

        let boxes: Vec<BBox> = extractor
            .placements(doc, 1)
            .unwrap()
            .into_iter()
            .map(|p| p.bbox)
            .collect();
        assert_eq!(
            boxes,
            vec![
                BBox { x0: 100.0, y0: 700.0, x1: 160.0, y1: 740.0 },
                BBox { x0: 100.0, y0: 500.0, x1: 130.0, y1: 530.0 },
                // Form matrix translates, inner cm scales.
                BBox { x0: 300.0, y0: 100.0, x1: 310.0, y1: 110.0 },
            ]
        );
    }

    #[test]
    fn test_undecodable_image_keeps_its_slot() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&mixed_catalog()).unwrap();

        let images = extractor.page_images(1).unwrap();
        assert_eq!(images.iter().map(|i| i.index).collect::<Vec<_>>(), vec![0, 1, 2]);
        assert!(images[0].image.is_ok());
        assert_eq!(images[1].name, "Im1");
        assert!(images[1].image.as_ref().unwrap_err().contains("JPXDecode"));

        let blue = images[2].image.as_ref().unwrap().to_rgb8();
        assert_eq!(blue.get_pixel(1, 1), &Rgb([0, 0, 255]));
    }

    #[test]
    fn test_page_lines_from_page_text() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&mixed_catalog()).unwrap();
        assert_eq!(extractor.page_count(), 2);
        assert_eq!(extractor.page_texts.len(), 2);

        let first = extractor.page_lines(1).unwrap();
        assert!(first.iter().any(|l| l.contains("Lipstick Rojo")));
        assert!(!first.iter().any(|l| l.contains("Perfume Floral")));

        let second = extractor.page_lines(2).unwrap();
        assert!(second.iter().any(|l| l.contains("Perfume Floral")));

        let records = PriceListParser::new().parse_page(&first);
        let products: Vec<&str> = records.iter().map(|r| r.product.as_str()).collect();
        assert_eq!(products, vec!["Lipstick Rojo", "Rubor Natural", "Delineador Negro"]);
    }

    #[test]
    fn test_page_lines_fall_back_to_lopdf() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&mixed_catalog()).unwrap();
        extractor.page_texts.clear();

        let lines = extractor.page_lines(2).unwrap();
        assert!(lines.iter().any(|l| l.contains("Perfume Floral S/. 45.00")));

        let records = PriceListParser::new().parse_page(&lines);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].product, "Perfume Floral");
    }

    #[test]
    fn test_empty_page_has_no_images() {
        let data = catalog_pdf(&[TestPage {
            lines: &["Only text"],
            images: &[],
        }]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();
        assert!(extractor.page_images(1).unwrap().is_empty());

        let data = catalog_pdf(&[TestPage {
            lines: &[],
            images: &[TestImage::Rgb([1, 2, 3])],
        }]);
        extractor.load(&data).unwrap();
        assert_eq!(extractor.page_images(1).unwrap().len(), 1);
    }

    #[test]
    fn test_dimensions_must_be_positive() {
        let image = |width: i64, height: i64| {
            Stream::new(
                dictionary! {
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8,
                },
                vec![0; 4],
            )
        };
        let doc = Document::with_version("1.5");

        assert!(decode_image(&doc, &image(2, 2)).is_ok());
        let err = decode_image(&doc, &image(-1, 2)).unwrap_err();
        assert_eq!(err, "invalid /Width -1");
        let err = decode_image(&doc, &image(2, 0)).unwrap_err();
        assert_eq!(err, "invalid /Height 0");
        assert!(decode_image(&doc, &image(i64::from(u32::MAX) + 1, 1)).is_err());

        let mut missing = image(2, 2);
        missing.dict.remove(b"Height");
        assert_eq!(decode_image(&doc, &missing).unwrap_err(), "missing /Height");
    }

    #[test]
    fn test_oversized_dimensions_do_not_overflow() {
        assert!(unpack_samples(&[0; 8], usize::MAX, 2, 3, 8).is_none());
        assert!(unpack_samples(&[0; 8], usize::MAX / 2, 3, 1, 8).is_none());
        assert!(unpack_samples(&[0; 8], 0, 0, 1, 8).is_none());
        assert!(decode_raw(&[0; 8], u32::MAX, u32::MAX, &ColorSpace::Rgb, 8).is_none());
    }

    #[test]
    fn test_invalid_page() {
        let mut extractor = PdfExtractor::new();
        extractor.load(&sample_pdf()).unwrap();

        assert!(matches!(extractor.page_images(2), Err(PdfError::InvalidPage(2))));
        assert!(matches!(extractor.page_lines(0), Err(PdfError::InvalidPage(0))));
    }

    #[test]
    fn test_split_text_into_pages() {
        assert_eq!(split_text_into_pages("a\nb\u{000C}c\u{000C}"), vec!["a\nb", "c"]);
        assert_eq!(split_text_into_pages(""), Vec::<String>::new());
    }

    #[test]
    fn test_unpack_one_bit_rows() {
        // 3 pixels per row, rows padded to a byte
        let data = [0b1010_0000, 0b0110_0000];
        let samples = unpack_samples(&data, 3, 2, 1, 1).unwrap();
        assert_eq!(samples, vec![1, 0, 1, 0, 1, 1]);

        assert!(unpack_samples(&data, 3, 3, 1, 1).is_none());
    }

    #[test]
    fn test_decode_indexed() {
        let cs = ColorSpace::Indexed {
            base: Box::new(ColorSpace::Rgb),
            lookup: vec![0, 0, 0, 10, 20, 30],
        };
        let img = decode_raw(&[1, 0, 7], 3, 1, &cs, 8).unwrap();

        assert_eq!(img.get_pixel(0, 0), &Rgb([10, 20, 30]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0, 0, 0]));
        // Out-of-table index falls back to black
        assert_eq!(img.get_pixel(2, 0), &Rgb([0, 0, 0]));
    }

    #[test]
    fn test_decode_cmyk_and_scaled_gray() {
        let img = decode_raw(&[0, 255, 255, 0], 1, 1, &ColorSpace::Cmyk, 8).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 0, 0]));

        let img = decode_raw(&[0b1100_0000], 2, 1, &ColorSpace::Gray, 2).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([255, 255, 255]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([0, 0, 0]));
    }
}
