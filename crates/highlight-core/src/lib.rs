//! Citation highlighting for source PDFs
//!
//! Given a PDF and `(page, snippet)` citations from a retrieval step, this
//! crate locates each snippet on its claimed page and builds a new PDF made
//! of only the pages where something was found, with the matched text
//! highlighted.
//!
//! - `CitationHighlighter::highlight`: PDFs stored under a data directory
//! - `highlight_bytes`: in-memory PDFs
//! - `highlight_document`: any engine implementing `SourceDocument`

pub mod aggregate;
pub mod assemble;
pub mod config;
pub mod error;
pub mod highlighter;
pub mod normalize;
pub mod page;
pub mod pdf;
pub mod primitive;
pub mod region;
pub mod strategy;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use aggregate::PageGroup;
pub use assemble::{assemble, HighlightReport, Highlighted};
pub use config::{HighlightStyle, MatchConfig};
pub use error::HighlightError;
pub use highlighter::{highlight_bytes, highlight_document, CitationHighlighter};
pub use normalize::normalize_snippet;
pub use page::{highlight_page, PageOutcome};
pub use primitive::{PagePrimitive, SourceDocument};
pub use region::Region;
pub use shared_types::Citation;
pub use strategy::{match_snippet, MatchResult, MatchStrategy};
