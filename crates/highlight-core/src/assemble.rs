//! Output document assembly
//!
//! Pages are processed in ascending order; a page is copied into the output
//! (with its highlights) only if at least one of its snippets matched. The
//! whole request fails if no page qualifies.

use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::PageGroup;
use crate::config::MatchConfig;
use crate::error::HighlightError;
use crate::page::{highlight_page, PageOutcome};
use crate::primitive::SourceDocument;

/// Per-page outcomes for one request, matched or not, in page order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct HighlightReport {
    pub pages: Vec<PageOutcome>,
}

impl HighlightReport {
    /// Source page numbers present in the output, ascending
    pub fn included_pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|p| p.matched())
            .map(|p| p.page)
            .collect()
    }

    pub fn region_count(&self) -> usize {
        self.pages.iter().map(|p| p.regions().count()).sum()
    }
}

/// A serialized highlighted document plus what went into it
#[derive(Debug, Clone)]
pub struct Highlighted {
    pub bytes: Vec<u8>,
    pub report: HighlightReport,
}

/// Highlight every grouped page of `source` and build the output document
pub fn assemble<D: SourceDocument>(
    source: D,
    group: &PageGroup,
    config: &MatchConfig,
) -> Result<Highlighted, HighlightError> {
    let mut kept = Vec::new();
    let mut report = HighlightReport::default();

    for (number, snippets) in group.iter() {
        let mut page = source.open_page(number)?;
        let outcome = highlight_page(number, &mut page, snippets, config)?;
        if outcome.matched() {
            kept.push(page);
        } else {
            debug!("Page {} dropped: no snippet located", number);
        }
        report.pages.push(outcome);
    }

    if kept.is_empty() {
        return Err(HighlightError::NoMatchFound {
            pages_attempted: report.pages.len(),
        });
    }

    let bytes = source.into_output(kept)?;
    info!(
        "Assembled {} of {} pages with {} highlights",
        report.included_pages().len(),
        report.pages.len(),
        report.region_count()
    );
    Ok(Highlighted { bytes, report })
}
