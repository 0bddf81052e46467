//! Mapping between MuPDF page space and PDF user space
//!
//! MuPDF reports positions with the origin at the top-left corner of the
//! displayed (rotated) crop box, y growing downwards. Annotations need default
//! user space: origin at the bottom-left of the unrotated page, y up.

use lopdf::{Document, Object, ObjectId};

use crate::region::Region;

/// US Letter, used when a page tree carries no usable box
const DEFAULT_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Attribute of a page, inherited from the page tree when not set locally
fn inherited<'a>(doc: &'a Document, page_id: ObjectId, key: &[u8]) -> Option<&'a Object> {
    let mut node = doc.get_object(page_id).ok()?.as_dict().ok()?;
    // Bounded walk; malformed trees can loop
    for _ in 0..32 {
        if let Ok(value) = node.get(key) {
            return match value {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            };
        }
        let parent = node.get(b"Parent").ok()?.as_reference().ok()?;
        node = doc.get_object(parent).ok()?.as_dict().ok()?;
    }
    None
}

fn page_box(doc: &Document, page_id: ObjectId, key: &[u8]) -> Option<[f64; 4]> {
    let values: Vec<f64> = inherited(doc, page_id, key)?
        .as_array()
        .ok()?
        .iter()
        .filter_map(|o| o.as_float().ok().map(f64::from))
        .collect();
    match values.as_slice() {
        [a, b, c, d] => Some([a.min(*c), b.min(*d), a.max(*c), b.max(*d)]),
        _ => None,
    }
}

/// Visible box and rotation of one page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSpace {
    x0: f64,
    y0: f64,
    width: f64,
    height: f64,
    /// Clockwise display rotation: 0, 90, 180 or 270
    rotate: i64,
}

impl PageSpace {
    pub fn new(bbox: [f64; 4], rotate: i64) -> Self {
        let rotate = (rotate.rem_euclid(360) + 45) / 90 * 90 % 360;
        Self {
            x0: bbox[0],
            y0: bbox[1],
            width: bbox[2] - bbox[0],
            height: bbox[3] - bbox[1],
            rotate,
        }
    }

    /// CropBox (falling back to MediaBox) and /Rotate of a page
    pub fn from_page(doc: &Document, page_id: ObjectId) -> Self {
        let bbox = page_box(doc, page_id, b"CropBox")
            .or_else(|| page_box(doc, page_id, b"MediaBox"))
            .unwrap_or(DEFAULT_BOX);
        let rotate = inherited(doc, page_id, b"Rotate")
            .and_then(|o| o.as_i64().ok())
            .unwrap_or(0);
        Self::new(bbox, rotate)
    }

    /// Convert a MuPDF point to PDF user space
    pub fn to_user(&self, x: f64, y: f64) -> (f64, f64) {
        let (u, v) = match self.rotate {
            90 => (y, x),
            180 => (self.width - x, y),
            270 => (self.width - y, self.height - x),
            _ => (x, self.height - y),
        };
        (self.x0 + u, self.y0 + v)
    }

    /// Bounding region, in user space, of a quad given in MuPDF space
    pub fn region(&self, corners: [(f64, f64); 4]) -> Region {
        let points = corners.map(|(x, y)| self.to_user(x, y));
        let (min_x, max_x, min_y, max_y) = points.iter().fold(
            (f64::MAX, f64::MIN, f64::MAX, f64::MIN),
            |(x0, x1, y0, y1), (x, y)| (x0.min(*x), x1.max(*x), y0.min(*y), y1.max(*y)),
        );
        Region::from_corners(min_x, min_y, max_x, max_y)
    }
}
