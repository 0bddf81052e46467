//! PDF source documents
//!
//! Each source is parsed twice from the same bytes: MuPDF locates phrases
//! (fonts, encodings and form XObjects are resolved the way a viewer does),
//! and lopdf holds the object tree the output is cut from.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use lopdf::{Document, ObjectId};
use mupdf::{Quad, TextPageOptions};
use tracing::{debug, warn};

use super::annotate::add_highlight_annotation;
use super::space::PageSpace;
use crate::config::HighlightStyle;
use crate::error::HighlightError;
use crate::primitive::{PagePrimitive, SourceDocument};
use crate::region::Region;

/// Upper bound on hits returned for one phrase on one page
const MAX_HITS: u32 = 500;

fn operation_error(e: impl std::fmt::Display) -> HighlightError {
    HighlightError::OperationError(e.to_string())
}

/// A PDF opened for one highlighting request
pub struct PdfSource {
    doc: Document,
    engine: mupdf::Document,
    pages: BTreeMap<u32, ObjectId>,
    style: HighlightStyle,
}

impl PdfSource {
    pub fn open(path: &Path) -> Result<Self, HighlightError> {
        let bytes =
            std::fs::read(path).map_err(|e| HighlightError::SourceUnavailable(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, HighlightError> {
        let doc = Document::load_mem(bytes)
            .map_err(|e| HighlightError::SourceUnavailable(e.to_string()))?;
        let engine = mupdf::Document::from_bytes(bytes, "application/pdf")
            .map_err(|e| HighlightError::SourceUnavailable(e.to_string()))?;
        let pages = doc.get_pages();
        Ok(Self {
            doc,
            engine,
            pages,
            style: HighlightStyle::default(),
        })
    }

    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.style = style;
        self
    }
}

/// A page of a `PdfSource` with its pending highlights.
///
/// Highlights stay on this transient value and are only written into the
/// document when the page is part of the output.
pub struct PdfPage {
    number: u32,
    page_id: ObjectId,
    page: mupdf::Page,
    space: PageSpace,
    highlights: Vec<Region>,
}

impl PdfPage {
    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn highlights(&self) -> &[Region] {
        &self.highlights
    }

    /// Extracted text, one line per text line
    pub fn text(&self) -> Result<String, HighlightError> {
        let text_page = self
            .page
            .to_text_page(TextPageOptions::empty())
            .map_err(operation_error)?;

        let mut lines = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                lines.push(line.chars().filter_map(|ch| ch.char()).collect::<String>());
            }
        }
        Ok(lines.join("\n"))
    }

    fn quad_region(&self, quad: &Quad) -> Region {
        let corner = |p: &mupdf::Point| (p.x as f64, p.y as f64);
        self.space.region([
            corner(&quad.ul),
            corner(&quad.ur),
            corner(&quad.ll),
            corner(&quad.lr),
        ])
    }
}

impl PagePrimitive for PdfPage {
    fn search(&self, phrase: &str) -> Vec<Region> {
        match self.page.search(phrase, MAX_HITS) {
            Ok(quads) => quads.iter().map(|q| self.quad_region(q)).collect(),
            Err(e) => {
                warn!("Search failed on page {}: {}", self.number, e);
                Vec::new()
            }
        }
    }

    fn highlight(&mut self, region: &Region) -> Result<(), HighlightError> {
        self.highlights.push(*region);
        Ok(())
    }
}

impl SourceDocument for PdfSource {
    type Page = PdfPage;

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn open_page(&self, number: u32) -> Result<PdfPage, HighlightError> {
        let page_id = *self.pages.get(&number).ok_or_else(|| {
            HighlightError::OperationError(format!(
                "Page {} does not exist (document has {} pages)",
                number,
                self.pages.len()
            ))
        })?;
        let index = i32::try_from(number - 1).map_err(operation_error)?;
        let page = self.engine.load_page(index).map_err(operation_error)?;

        Ok(PdfPage {
            number,
            page_id,
            page,
            space: PageSpace::from_page(&self.doc, page_id),
            highlights: Vec::new(),
        })
    }

    fn into_output(self, pages: Vec<PdfPage>) -> Result<Vec<u8>, HighlightError> {
        let Self {
            mut doc,
            pages: all_pages,
            style,
            ..
        } = self;

        for page in &pages {
            for region in &page.highlights {
                add_highlight_annotation(&mut doc, page.page_id, region, &style)?;
            }
        }

        let keep: HashSet<u32> = pages.iter().map(|p| p.number).collect();
        let mut to_delete: Vec<u32> = all_pages
            .keys()
            .copied()
            .filter(|n| !keep.contains(n))
            .collect();

        // Delete in reverse order to keep the remaining page numbers stable
        to_delete.reverse();
        for number in to_delete {
            doc.delete_pages(&[number]);
        }

        doc.prune_objects();
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| HighlightError::OperationError(format!("Save failed: {}", e)))?;
        debug!("Wrote {} pages ({} bytes)", keep.len(), buffer.len());
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixture_pdf;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Dictionary, Object, Stream, StringFormat};

    fn source(pages: &[&[&str]]) -> PdfSource {
        PdfSource::from_bytes(&fixture_pdf(pages)).unwrap()
    }

    fn highlight_count(doc: &Document, page_id: ObjectId) -> usize {
        let page = doc.get_object(page_id).unwrap().as_dict().unwrap();
        match page.get(b"Annots") {
            Ok(Object::Array(items)) => items.len(),
            _ => 0,
        }
    }

    fn helvetica(doc: &mut Document) -> ObjectId {
        doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        })
    }

    /// One-page PDF drawing `operations` with the given page resources and attributes
    fn single_page(
        mut doc: Document,
        operations: Vec<Operation>,
        resources: Dictionary,
        extra: Dictionary,
    ) -> Vec<u8> {
        let pages_id = doc.new_object_id();
        let content_id = doc.add_object(Stream::new(
            Dictionary::new(),
            Content { operations }.encode().unwrap(),
        ));
        let mut page = dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => content_id,
            "Resources" => resources,
        };
        for (key, value) in extra.iter() {
            page.set(key.clone(), value.clone());
        }
        let page_id = doc.add_object(page);
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => 1,
                "Kids" => vec![page_id.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
        doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer).unwrap();
        buffer
    }

    fn show_text(font: &str, x: i64, y: i64, text: Object) -> Vec<Operation> {
        vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![font.into(), 12.into()]),
            Operation::new("Td", vec![x.into(), y.into()]),
            Operation::new("Tj", vec![text]),
            Operation::new("ET", vec![]),
        ]
    }

    const TO_UNICODE: &str = "/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
1 beginbfrange
<0000> <00FF> <0000>
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

    #[test]
    fn test_page_count_and_text() {
        let src = source(&[&["first"], &["second", "page"]]);
        assert_eq!(src.page_count(), 2);
        assert_eq!(src.open_page(2).unwrap().text().unwrap(), "second\npage");
    }

    #[test]
    fn test_open_missing_page_fails() {
        let src = source(&[&["only"]]);
        assert!(matches!(
            src.open_page(3),
            Err(HighlightError::OperationError(_))
        ));
    }

    #[test]
    fn test_search_is_case_insensitive_and_finds_every_occurrence() {
        let src = source(&[&["fee fee fee", "the Fee schedule"]]);
        let page = src.open_page(1).unwrap();
        assert_eq!(page.search("FEE").len(), 4);
        assert!(page.search("parking lot").is_empty());
    }

    #[test]
    fn test_regions_are_in_user_space() {
        // 12pt text at x=72 on baselines 720 and 706
        let src = source(&[&["abcd", "efgh"]]);
        let page = src.open_page(1).unwrap();

        let first = page.search("abcd")[0];
        assert!((first.x - 72.0).abs() < 1.0);
        assert!(first.y < 720.0 && first.top() > 720.0);
        assert!(first.top() < 735.0);

        let second = page.search("efgh")[0];
        assert!(second.y < 706.0 && second.top() > 706.0);
        assert!(second.top() <= first.top() - 10.0);
    }

    #[test]
    fn test_rotated_page_regions_stay_on_the_text() {
        let mut doc = Document::with_version("1.7");
        let font = helvetica(&mut doc);
        let bytes = single_page(
            doc,
            show_text("F1", 72, 720, Object::string_literal("Rotated bylaw text")),
            dictionary! { "Font" => dictionary! { "F1" => font } },
            dictionary! { "Rotate" => 90 },
        );

        let src = PdfSource::from_bytes(&bytes).unwrap();
        let region = src.open_page(1).unwrap().search("bylaw")[0];
        assert!(region.x > 72.0 && region.x < 200.0);
        assert!(region.y < 720.0 && region.top() > 720.0);
    }

    #[test]
    fn test_finds_text_in_composite_font_with_to_unicode() {
        let mut doc = Document::with_version("1.7");
        let cmap = doc.add_object(Stream::new(Dictionary::new(), TO_UNICODE.as_bytes().to_vec()));
        let descendant = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "CIDFontType2",
            "BaseFont" => "Helvetica",
            "CIDSystemInfo" => dictionary! {
                "Registry" => Object::string_literal("Adobe"),
                "Ordering" => Object::string_literal("Identity"),
                "Supplement" => 0,
            },
            "DW" => 600,
            "CIDToGIDMap" => "Identity",
        });
        let font = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type0",
            "BaseFont" => "Helvetica",
            "Encoding" => "Identity-H",
            "DescendantFonts" => vec![descendant.into()],
            "ToUnicode" => cmap,
        });

        let codes: Vec<u8> = "Dogs must be leashed."
            .encode_utf16()
            .flat_map(u16::to_be_bytes)
            .collect();
        let bytes = single_page(
            doc,
            show_text("F0", 72, 720, Object::String(codes, StringFormat::Hexadecimal)),
            dictionary! { "Font" => dictionary! { "F0" => font } },
            Dictionary::new(),
        );

        let src = PdfSource::from_bytes(&bytes).unwrap();
        let page = src.open_page(1).unwrap();
        assert_eq!(page.search("Dogs must be leashed.").len(), 1);
    }

    #[test]
    fn test_finds_text_drawn_through_form_xobject() {
        let mut doc = Document::with_version("1.7");
        let font = helvetica(&mut doc);
        let form_content = Content {
            operations: show_text("F1", 72, 720, Object::string_literal("Dogs must be leashed.")),
        };
        let form = doc.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Form",
                "BBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Resources" => dictionary! { "Font" => dictionary! { "F1" => font } },
            },
            form_content.encode().unwrap(),
        ));
        let bytes = single_page(
            doc,
            vec![
                Operation::new("q", vec![]),
                Operation::new("Do", vec!["X1".into()]),
                Operation::new("Q", vec![]),
            ],
            dictionary! { "XObject" => dictionary! { "X1" => form } },
            Dictionary::new(),
        );

        let src = PdfSource::from_bytes(&bytes).unwrap();
        let regions = src.open_page(1).unwrap().search("dogs must be leashed");
        assert_eq!(regions.len(), 1);
        assert!(regions[0].y < 720.0 && regions[0].top() > 720.0);
    }

    #[test]
    fn test_highlights_are_deferred_until_output() {
        let src = source(&[&["Dogs must be leashed."]]);
        let mut page = src.open_page(1).unwrap();
        let regions = page.search("leashed");
        page.highlight(&regions[0]).unwrap();

        assert_eq!(page.highlights().len(), 1);
        assert_eq!(highlight_count(&src.doc, page.page_id), 0);
    }

    #[test]
    fn test_output_keeps_selected_pages_with_annotations() {
        let src = source(&[&["one"], &["two words"], &["three"], &["four words"]]);
        let mut second = src.open_page(2).unwrap();
        let mut fourth = src.open_page(4).unwrap();
        for page in [&mut second, &mut fourth] {
            let region = page.search("words")[0];
            page.highlight(&region).unwrap();
        }

        let bytes = src.into_output(vec![second, fourth]).unwrap();
        let out = PdfSource::from_bytes(&bytes).unwrap();

        assert_eq!(out.page_count(), 2);
        let texts: Vec<String> = (1..=2)
            .map(|n| out.open_page(n).unwrap().text().unwrap())
            .collect();
        assert_eq!(texts, vec!["two words", "four words"]);
        assert!(out.pages.values().all(|id| highlight_count(&out.doc, *id) == 1));
    }

    #[test]
    fn test_invalid_bytes_are_unavailable() {
        assert!(matches!(
            PdfSource::from_bytes(b"not a pdf"),
            Err(HighlightError::SourceUnavailable(_))
        ));
    }

    #[test]
    fn test_missing_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let result = PdfSource::open(&dir.path().join("absent.pdf"));
        assert!(matches!(result, Err(HighlightError::SourceUnavailable(_))));
    }
}
