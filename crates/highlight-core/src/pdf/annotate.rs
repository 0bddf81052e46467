//! Highlight annotations

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::config::HighlightStyle;
use crate::error::HighlightError;
use crate::region::Region;

/// Annotation flag: print with the page
const FLAG_PRINT: i64 = 4;

fn reals(values: &[f64]) -> Object {
    Object::Array(values.iter().map(|v| Object::Real(*v as f32)).collect())
}

/// Add a `/Highlight` markup annotation covering `region` to a page
pub fn add_highlight_annotation(
    doc: &mut Document,
    page_id: ObjectId,
    region: &Region,
    style: &HighlightStyle,
) -> Result<ObjectId, HighlightError> {
    let (r, g, b) = style.rgb();

    let mut annot = Dictionary::new();
    annot.set("Type", Object::Name(b"Annot".to_vec()));
    annot.set("Subtype", Object::Name(b"Highlight".to_vec()));
    annot.set(
        "Rect",
        reals(&[region.x, region.y, region.right(), region.top()]),
    );
    annot.set("QuadPoints", reals(&region.quad_points()));
    annot.set("F", Object::Integer(FLAG_PRINT));
    annot.set("CA", Object::Real(style.opacity as f32));
    annot.set(
        "C",
        Object::Array(vec![Object::Real(r), Object::Real(g), Object::Real(b)]),
    );
    annot.set("P", Object::Reference(page_id));

    let annot_id = doc.add_object(Object::Dictionary(annot));
    add_annotation_to_page(doc, page_id, annot_id)?;
    Ok(annot_id)
}

fn add_annotation_to_page(
    doc: &mut Document,
    page_id: ObjectId,
    annot_id: ObjectId,
) -> Result<(), HighlightError> {
    // An indirect /Annots array is updated in place
    let indirect = doc
        .get_object(page_id)
        .and_then(Object::as_dict)
        .and_then(|page| page.get(b"Annots"))
        .and_then(Object::as_reference)
        .ok();
    if let Some(array_id) = indirect {
        if let Ok(Object::Array(ref mut arr)) = doc.get_object_mut(array_id) {
            arr.push(Object::Reference(annot_id));
            return Ok(());
        }
    }

    let page = doc
        .get_object_mut(page_id)
        .map_err(|e| HighlightError::OperationError(e.to_string()))?;

    if let Object::Dictionary(ref mut page_dict) = page {
        if let Ok(Object::Array(ref mut arr)) = page_dict.get_mut(b"Annots") {
            arr.push(Object::Reference(annot_id));
        } else {
            page_dict.set("Annots", Object::Array(vec![Object::Reference(annot_id)]));
        }
        Ok(())
    } else {
        Err(HighlightError::OperationError(format!(
            "Object {:?} is not a page dictionary",
            page_id
        )))
    }
}
