//! Catalog PDFs built in memory for tests.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, Stream, dictionary};

/// An image drawn on a test page.
#[derive(Debug, Clone, Copy)]
pub(crate) enum TestImage {
    /// 2x2 image of one colour.
    Rgb([u8; 3]),
    /// JPEG 2000 stream, which the extractor does not decode.
    Jpx,
}

/// One page: its text lines, top to bottom, and the images drawn on it.
pub(crate) struct TestPage<'a> {
    pub lines: &'a [&'a str],
    pub images: &'a [TestImage],
}

fn image_stream(image: TestImage) -> Stream {
    match image {
        TestImage::Rgb(rgb) => Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 2,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
            },
            rgb.repeat(4),
        ),
        TestImage::Jpx => Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => 2,
                "Height" => 2,
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "JPXDecode",
            },
            vec![0, 0, 0, 12, 106, 80, 32, 32],
        ),
    }
}

/// Build a PDF with Helvetica text lines and images stacked down each page.
pub(crate) fn catalog_pdf(pages: &[TestPage]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });

    let mut kids: Vec<Object> = Vec::new();
    for page in pages {
        let mut ops = Vec::new();
        for (i, line) in page.lines.iter().enumerate() {
            let y = 780 - 60 * i as i64;
            ops.push(Operation::new("BT", vec![]));
            ops.push(Operation::new("Tf", vec!["F1".into(), 12.into()]));
            ops.push(Operation::new("Td", vec![50.into(), y.into()]));
            ops.push(Operation::new("Tj", vec![Object::string_literal(*line)]));
            ops.push(Operation::new("ET", vec![]));
        }

        let mut xobjects = Dictionary::new();
        for (i, image) in page.images.iter().enumerate() {
            let name = format!("Im{}", i);
            xobjects.set(name.as_bytes(), doc.add_object(image_stream(*image)));

            let y = 720 - 60 * i as i64;
            ops.push(Operation::new("q", vec![]));
            ops.push(Operation::new(
                "cm",
                vec![40.into(), 0.into(), 0.into(), 40.into(), 450.into(), y.into()],
            ));
            ops.push(Operation::new("Do", vec![Object::Name(name.into_bytes())]));
            ops.push(Operation::new("Q", vec![]));
        }

        let content = Content { operations: ops }
            .encode()
            .expect("encode test content");
        let content_id = doc.add_object(Stream::new(dictionary! {}, content));

        kids.push(
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
                "Resources" => dictionary! {
                    "Font" => dictionary! { "F1" => font },
                    "XObject" => xobjects,
                },
            })
            .into(),
        );
    }

    let count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buf = Vec::new();
    doc.save_to(&mut buf).expect("write test pdf");
    buf
}

/// Two-page catalog: three products over an RGB, JPX, RGB image column on
/// the first page, one product and one image on the second.
pub(crate) fn mixed_catalog() -> Vec<u8> {
    catalog_pdf(&[
        TestPage {
            lines: &[
                "CATALOGO 2024",
                "Lipstick Rojo S/. 10.00 S/. 8.00",
                "Rubor Natural S/. 5.50",
                "Delineador Negro S/. 12.00 S/. 9.90",
                "Pagina 1",
            ],
            images: &[
                TestImage::Rgb([255, 0, 0]),
                TestImage::Jpx,
                TestImage::Rgb([0, 0, 255]),
            ],
        },
        TestPage {
            lines: &["CATALOGO 2024", "Perfume Floral S/. 45.00", "Pagina 2"],
            images: &[TestImage::Rgb([0, 255, 0])],
        },
    ])
}
