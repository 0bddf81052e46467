//! Per-page highlighting

use serde::Serialize;
use tracing::debug;

use crate::config::MatchConfig;
use crate::error::HighlightError;
use crate::primitive::PagePrimitive;
use crate::region::Region;
use crate::strategy::{match_snippet, MatchResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageOutcome {
    /// 1-indexed page number in the source document
    pub page: u32,
    /// One entry per snippet, in input order
    pub results: Vec<MatchResult>,
}

impl PageOutcome {
    pub fn matched(&self) -> bool {
        self.results.iter().any(MatchResult::found)
    }

    pub fn matched_snippets(&self) -> usize {
        self.results.iter().filter(|r| r.found()).count()
    }

    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.results.iter().flat_map(|r| r.regions.iter())
    }
}

/// Run the strategy chain for every snippet claimed for a page.
///
/// Every snippet is attempted even after one succeeds: each may highlight a
/// different part of the page, and the page is kept if any of them matched.
pub fn highlight_page<P: PagePrimitive + ?Sized>(
    number: u32,
    page: &mut P,
    snippets: &[String],
    config: &MatchConfig,
) -> Result<PageOutcome, HighlightError> {
    let mut results = Vec::with_capacity(snippets.len());
    for snippet in snippets {
        results.push(match_snippet(page, snippet, config)?);
    }

    let outcome = PageOutcome {
        page: number,
        results,
    };
    debug!(
        "Page {}: {}/{} snippets matched",
        number,
        outcome.matched_snippets(),
        snippets.len()
    );
    Ok(outcome)
}
