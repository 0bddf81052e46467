//! Test fixtures
//!
//! - `MockPage` / `MockDocument`: an in-memory engine whose search is a plain
//!   case-insensitive substring scan per line
//! - `fixture_pdf`: builds a real PDF whose pages contain the given lines

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use lopdf::{content::Content, content::Operation, dictionary, Document, Object, Stream};

use crate::error::HighlightError;
use crate::primitive::{PagePrimitive, SourceDocument};
use crate::region::Region;

const LINE_HEIGHT: f64 = 20.0;
const GLYPH_HEIGHT: f64 = 10.0;

/// A page made of text lines. Regions are expressed in "character cells":
/// `x` is the byte offset in the line, `y` is the line index times 20.
#[derive(Debug, Default)]
pub struct MockPage {
    pub number: u32,
    pub lines: Vec<String>,
    pub highlighted: Vec<Region>,
    searches: RefCell<Vec<String>>,
}

impl MockPage {
    pub fn new(lines: &[&str]) -> Self {
        Self::numbered(1, lines)
    }

    pub fn numbered(number: u32, lines: &[&str]) -> Self {
        Self {
            number,
            lines: lines.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Every phrase passed to `search`, in call order
    pub fn searches(&self) -> Vec<String> {
        self.searches.borrow().clone()
    }

    /// Text covered by a region this page produced
    pub fn text_at(&self, region: &Region) -> Option<&str> {
        let line = self.lines.get((region.y / LINE_HEIGHT) as usize)?;
        let start = region.x as usize;
        line.get(start..start + region.width as usize)
    }
}

impl PagePrimitive for MockPage {
    fn search(&self, phrase: &str) -> Vec<Region> {
        self.searches.borrow_mut().push(phrase.to_string());
        let needle = phrase.to_ascii_lowercase();
        if needle.is_empty() {
            return vec![];
        }

        let mut regions = Vec::new();
        for (index, line) in self.lines.iter().enumerate() {
            let haystack = line.to_ascii_lowercase();
            let mut from = 0;
            while let Some(offset) = haystack[from..].find(&needle) {
                let start = from + offset;
                regions.push(Region::new(
                    start as f64,
                    index as f64 * LINE_HEIGHT,
                    needle.len() as f64,
                    GLYPH_HEIGHT,
                ));
                from = start + needle.len();
            }
        }
        regions
    }

    fn highlight(&mut self, region: &Region) -> Result<(), HighlightError> {
        self.highlighted.push(*region);
        Ok(())
    }
}

/// Pages of lines; `into_output` serializes `[(page, highlights)]` as JSON.
pub struct MockDocument {
    pages: Vec<Vec<String>>,
    released: Rc<Cell<bool>>,
}

impl MockDocument {
    pub fn new(pages: &[&[&str]]) -> Self {
        Self {
            pages: pages
                .iter()
                .map(|lines| lines.iter().map(|l| l.to_string()).collect())
                .collect(),
            released: Rc::new(Cell::new(false)),
        }
    }

    /// Flag that flips to `true` once the document has been dropped
    pub fn release_flag(&self) -> Rc<Cell<bool>> {
        Rc::clone(&self.released)
    }

    /// Decode the bytes produced by `into_output`
    pub fn decode_output(bytes: &[u8]) -> Vec<(u32, Vec<Region>)> {
        serde_json::from_slice(bytes).unwrap_or_default()
    }
}

impl Drop for MockDocument {
    fn drop(&mut self) {
        self.released.set(true);
    }
}

impl SourceDocument for MockDocument {
    type Page = MockPage;

    fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    fn open_page(&self, number: u32) -> Result<MockPage, HighlightError> {
        let lines = self
            .pages
            .get((number as usize).wrapping_sub(1))
            .ok_or_else(|| HighlightError::OperationError(format!("No page {}", number)))?;
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        Ok(MockPage::numbered(number, &lines))
    }

    fn into_output(self, pages: Vec<MockPage>) -> Result<Vec<u8>, HighlightError> {
        let summary: Vec<(u32, Vec<Region>)> = pages
            .into_iter()
            .map(|page| (page.number, page.highlighted))
            .collect();
        serde_json::to_vec(&summary).map_err(|e| HighlightError::OperationError(e.to_string()))
    }
}

/// Build a PDF with one page per entry, each line drawn in 12pt Helvetica
/// starting at (72, 720) with 14pt leading.
pub fn fixture_pdf(pages: &[&[&str]]) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });

    let mut page_ids = Vec::new();
    for lines in pages {
        let mut operations = vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec![Object::Name(b"F1".to_vec()), Object::Integer(12)]),
            Operation::new("TL", vec![Object::Integer(14)]),
            Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
        ];
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                operations.push(Operation::new("T*", vec![]));
            }
            operations.push(Operation::new(
                "Tj",
                vec![Object::String(
                    line.as_bytes().to_vec(),
                    lopdf::StringFormat::Literal,
                )],
            ));
        }
        operations.push(Operation::new("ET", vec![]));

        let content = Content { operations };
        let content_id = doc.add_object(Stream::new(
            lopdf::Dictionary::new(),
            content.encode().expect("fixture content encodes"),
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => Object::Reference(pages_id),
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
            "Contents" => Object::Reference(content_id),
            "Resources" => dictionary! {
                "Font" => dictionary! {
                    "F1" => Object::Reference(font_id),
                },
            },
        });
        page_ids.push(page_id);
    }

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Count" => page_ids.len() as i64,
        "Kids" => page_ids.iter().map(|id| Object::Reference(*id)).collect::<Vec<_>>(),
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).expect("fixture PDF serializes");
    buffer
}

/// Number of pages in a serialized PDF; 0 if it does not parse
pub fn page_count(bytes: &[u8]) -> u32 {
    Document::load_mem(bytes)
        .map(|doc| doc.get_pages().len() as u32)
        .unwrap_or(0)
}
