//! Locating images drawn on a page.
//!
//! Walks the page content stream, tracking the current transformation
//! matrix through `q`/`Q`/`cm`, and records every image XObject painted by
//! `Do` together with its bounding box in page space. Form XObjects are
//! descended into so images nested in forms keep their drawing order.

use lopdf::content::Content;
use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::trace;

/// Deepest nesting of form XObjects that is followed.
const MAX_FORM_DEPTH: usize = 8;

/// Axis-aligned box in PDF user space (origin bottom-left).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

/// Affine transform `[a b c d e f]` as used by `cm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix(pub [f32; 6]);

impl Matrix {
    pub const IDENTITY: Matrix = Matrix([1.0, 0.0, 0.0, 1.0, 0.0, 0.0]);

    /// `self × other`; for `cm` the new CTM is `operand.then(ctm)`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        let [a1, b1, c1, d1, e1, f1] = self.0;
        let [a2, b2, c2, d2, e2, f2] = other.0;
        Matrix([
            a1 * a2 + b1 * c2,
            a1 * b2 + b1 * d2,
            c1 * a2 + d1 * c2,
            c1 * b2 + d1 * d2,
            e1 * a2 + f1 * c2 + e2,
            e1 * b2 + f1 * d2 + f2,
        ])
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        let [a, b, c, d, e, f] = self.0;
        (a * x + c * y + e, b * x + d * y + f)
    }

    /// Bounding box of the unit square, which is where images are painted.
    pub fn unit_bbox(&self) -> BBox {
        let corners = [
            self.apply(0.0, 0.0),
            self.apply(1.0, 0.0),
            self.apply(0.0, 1.0),
            self.apply(1.0, 1.0),
        ];
        let mut bbox = BBox {
            x0: f32::MAX,
            y0: f32::MAX,
            x1: f32::MIN,
            y1: f32::MIN,
        };
        for (x, y) in corners {
            bbox.x0 = bbox.x0.min(x);
            bbox.y0 = bbox.y0.min(y);
            bbox.x1 = bbox.x1.max(x);
            bbox.y1 = bbox.y1.max(y);
        }
        bbox
    }

    fn from_operands(operands: &[Object]) -> Option<Matrix> {
        if operands.len() != 6 {
            return None;
        }
        let mut m = [0.0f32; 6];
        for (slot, operand) in m.iter_mut().zip(operands) {
            *slot = number(operand)?;
        }
        Some(Matrix(m))
    }
}

/// An image XObject painted on a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Resource name the image was painted under.
    pub name: String,
    /// Object holding the image stream.
    pub object_id: ObjectId,
    /// Painted area in page space.
    pub bbox: BBox,
}

pub(crate) fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// Collect image placements from decoded content, in drawing order.
pub(crate) fn collect_placements(
    doc: &Document,
    content: &Content,
    resources: &Dictionary,
    base: Matrix,
    depth: usize,
    out: &mut Vec<Placement>,
) {
    let mut ctm = base;
    let mut stack: Vec<Matrix> = Vec::new();

    for op in &content.operations {
        match op.operator.as_str() {
            "q" => stack.push(ctm),
            "Q" => {
                if let Some(saved) = stack.pop() {
                    ctm = saved;
                }
            }
            "cm" => {
                if let Some(m) = Matrix::from_operands(&op.operands) {
                    ctm = m.then(&ctm);
                }
            }
            "Do" => {
                let Some(name) = op.operands.first().and_then(|o| o.as_name().ok()) else {
                    continue;
                };
                paint_xobject(doc, resources, name, ctm, depth, out);
            }
            _ => {}
        }
    }
}

fn paint_xobject(
    doc: &Document,
    resources: &Dictionary,
    name: &[u8],
    ctm: Matrix,
    depth: usize,
    out: &mut Vec<Placement>,
) {
    let Some(xobjects) = resources
        .get(b"XObject")
        .ok()
        .and_then(|o| doc.dereference(o).ok())
        .and_then(|(_, o)| o.as_dict().ok())
    else {
        return;
    };

    let Ok(Object::Reference(id)) = xobjects.get(name) else {
        trace!("XObject {} is not an indirect reference", String::from_utf8_lossy(name));
        return;
    };
    let Ok(Object::Stream(stream)) = doc.get_object(*id) else {
        return;
    };

    match stream.dict.get(b"Subtype").and_then(|o| o.as_name()) {
        Ok(b"Image") => {
            let bbox = ctm.unit_bbox();
            trace!(
                "Image {} at ({:.1}, {:.1})-({:.1}, {:.1})",
                String::from_utf8_lossy(name), bbox.x0, bbox.y0, bbox.x1, bbox.y1
            );
            out.push(Placement {
                name: String::from_utf8_lossy(name).into_owned(),
                object_id: *id,
                bbox,
            });
        }
        Ok(b"Form") if depth < MAX_FORM_DEPTH => {
            let form_matrix = stream
                .dict
                .get(b"Matrix")
                .and_then(|o| o.as_array())
                .ok()
                .and_then(|arr| Matrix::from_operands(arr))
                .unwrap_or(Matrix::IDENTITY);

            let form_resources = stream
                .dict
                .get(b"Resources")
                .ok()
                .and_then(|o| doc.dereference(o).ok())
                .and_then(|(_, o)| o.as_dict().ok())
                .unwrap_or(resources);

            let data = stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone());
            match Content::decode(&data) {
                Ok(content) => collect_placements(
                    doc,
                    &content,
                    form_resources,
                    form_matrix.then(&ctm),
                    depth + 1,
                    out,
                ),
                Err(e) => trace!("Skipping undecodable form {}: {}", String::from_utf8_lossy(name), e),
            }
        }
        _ => {}
    }
}
