//! Snippet location strategy chain
//!
//! A retrieved snippet is extracted independently of the rendered page, so an
//! exact phrase search can fail on line wraps, hyphenation or list
//! punctuation. Strategies run in order until one highlights something:
//!
//! 1. Exact: the whole normalized snippet; every occurrence is highlighted.
//! 2. Delimiter split (snippet contains the delimiter): every comma-separated
//!    part at least `min_part_length` long is searched and highlighted. All
//!    parts are tried; one hit is enough.
//! 3. Sliding window: contiguous word runs from `W-1` words down to
//!    `min_window_size`; the first run found is highlighted and the search
//!    stops. Worst case O(W²) searches, acceptable for sentence-sized snippets.

use serde::Serialize;
use tracing::debug;

use crate::config::MatchConfig;
use crate::error::HighlightError;
use crate::normalize::normalize_snippet;
use crate::primitive::PagePrimitive;
use crate::region::Region;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum MatchStrategy {
    Exact,
    DelimiterSplit,
    /// `window` is the number of words in the phrase that matched
    SlidingWindow { window: usize },
}

/// Outcome of locating one snippet on one page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    /// The snippet after whitespace normalization
    pub snippet: String,
    pub strategy: Option<MatchStrategy>,
    /// Regions that were highlighted; never contains an empty region
    pub regions: Vec<Region>,
}

impl MatchResult {
    fn not_found(snippet: String) -> Self {
        Self {
            snippet,
            strategy: None,
            regions: Vec::new(),
        }
    }

    fn matched(snippet: String, strategy: MatchStrategy, regions: Vec<Region>) -> Self {
        Self {
            snippet,
            strategy: Some(strategy),
            regions,
        }
    }

    pub fn found(&self) -> bool {
        !self.regions.is_empty()
    }
}

/// Locate `snippet` on `page` and highlight what was found
pub fn match_snippet<P: PagePrimitive + ?Sized>(
    page: &mut P,
    snippet: &str,
    config: &MatchConfig,
) -> Result<MatchResult, HighlightError> {
    let normalized = normalize_snippet(snippet);
    if normalized.is_empty() {
        debug!("Skipping empty snippet");
        return Ok(MatchResult::not_found(normalized));
    }

    let regions = search_and_highlight(page, &normalized)?;
    if !regions.is_empty() {
        debug!("Exact match for {:?} ({} regions)", normalized, regions.len());
        return Ok(MatchResult::matched(normalized, MatchStrategy::Exact, regions));
    }

    if config.delimiter_split && normalized.contains(config.delimiter) {
        let regions = split_on_delimiter(page, &normalized, config)?;
        if !regions.is_empty() {
            debug!(
                "Delimiter-split match for {:?} ({} regions)",
                normalized,
                regions.len()
            );
            return Ok(MatchResult::matched(
                normalized,
                MatchStrategy::DelimiterSplit,
                regions,
            ));
        }
    }

    if let Some((window, regions)) = sliding_window(page, &normalized, config)? {
        debug!(
            "Sliding-window match for {:?} with {} words",
            normalized, window
        );
        return Ok(MatchResult::matched(
            normalized,
            MatchStrategy::SlidingWindow { window },
            regions,
        ));
    }

    debug!("No match for {:?}", normalized);
    Ok(MatchResult::not_found(normalized))
}

/// Search `phrase` and highlight every non-empty region returned
fn search_and_highlight<P: PagePrimitive + ?Sized>(
    page: &mut P,
    phrase: &str,
) -> Result<Vec<Region>, HighlightError> {
    let regions: Vec<Region> = page
        .search(phrase)
        .into_iter()
        .filter(|region| !region.is_empty())
        .collect();
    for region in &regions {
        page.highlight(region)?;
    }
    Ok(regions)
}

fn split_on_delimiter<P: PagePrimitive + ?Sized>(
    page: &mut P,
    snippet: &str,
    config: &MatchConfig,
) -> Result<Vec<Region>, HighlightError> {
    let mut regions = Vec::new();
    let parts = snippet
        .split(config.delimiter)
        .map(str::trim)
        .filter(|part| part.chars().count() >= config.min_part_length);

    // No early exit: every part gets its own highlight
    for part in parts {
        regions.extend(search_and_highlight(page, part)?);
    }
    Ok(regions)
}

fn sliding_window<P: PagePrimitive + ?Sized>(
    page: &mut P,
    snippet: &str,
    config: &MatchConfig,
) -> Result<Option<(usize, Vec<Region>)>, HighlightError> {
    let words: Vec<&str> = snippet.split(' ').collect();
    let total = words.len();
    let floor = config.min_window_size.max(1);

    for window in (floor..total).rev() {
        for start in 0..=total - window {
            let phrase = words[start..start + window].join(" ");
            let regions = search_and_highlight(page, &phrase)?;
            if !regions.is_empty() {
                return Ok(Some((window, regions)));
            }
        }
    }
    Ok(None)
}
