//! Seams to the underlying document engine
//!
//! The matching logic only needs two things from a page (phrase search and
//! highlighting) and four from a document (page count, page access, and
//! building the output from a subset of pages). `crate::pdf` implements both
//! on top of MuPDF and lopdf; tests use in-memory mocks.

use crate::error::HighlightError;
use crate::region::Region;

/// Phrase search and annotation on a single page
pub trait PagePrimitive {
    /// Every region where `phrase` occurs on the page; empty if absent.
    fn search(&self, phrase: &str) -> Vec<Region>;

    /// Mark `region` with a visible highlight.
    fn highlight(&mut self, region: &Region) -> Result<(), HighlightError>;
}

/// A source document opened for one highlighting request.
///
/// Dropping the value releases it; `into_output` consumes it so the source is
/// released as soon as the output bytes exist.
pub trait SourceDocument {
    type Page: PagePrimitive;

    fn page_count(&self) -> u32;

    /// Open page `number` (1-indexed) as a transient, annotatable page object
    fn open_page(&self, number: u32) -> Result<Self::Page, HighlightError>;

    /// Serialize a new document made of `pages` (ascending, with their
    /// highlights applied) and nothing else.
    fn into_output(self, pages: Vec<Self::Page>) -> Result<Vec<u8>, HighlightError>;
}
