//! Grouping citations by page

use std::collections::BTreeMap;

use shared_types::Citation;
use tracing::debug;

use crate::error::HighlightError;

/// Snippets claimed for each page, iterated in ascending page order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageGroup {
    pages: BTreeMap<u32, Vec<String>>,
}

impl PageGroup {
    /// Group `citations` for a document of `page_count` pages.
    ///
    /// Citations outside `1..=page_count` are dropped. Fails with
    /// `NoValidCitations` when nothing is left.
    pub fn from_citations(citations: &[Citation], page_count: u32) -> Result<Self, HighlightError> {
        let mut pages: BTreeMap<u32, Vec<String>> = BTreeMap::new();

        for citation in citations {
            match u32::try_from(citation.page) {
                Ok(page) if (1..=page_count).contains(&page) => {
                    pages.entry(page).or_default().push(citation.snippet.clone());
                }
                _ => debug!(
                    "Dropping citation for page {} (document has {} pages)",
                    citation.page, page_count
                ),
            }
        }

        if pages.is_empty() {
            return Err(HighlightError::NoValidCitations);
        }
        Ok(Self { pages })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[String])> + '_ {
        self.pages
            .iter()
            .map(|(page, snippets)| (*page, snippets.as_slice()))
    }

    pub fn page_numbers(&self) -> Vec<u32> {
        self.pages.keys().copied().collect()
    }

    pub fn snippets(&self, page: u32) -> Option<&[String]> {
        self.pages.get(&page).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
