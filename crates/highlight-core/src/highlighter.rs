//! Entry points tying the pipeline together

use std::path::{Component, Path, PathBuf};

use shared_types::Citation;
use tracing::{info, warn};

use crate::aggregate::PageGroup;
use crate::assemble::{assemble, Highlighted};
use crate::config::{HighlightStyle, MatchConfig};
use crate::error::HighlightError;
use crate::pdf::PdfSource;
use crate::primitive::SourceDocument;

/// Group, match and assemble against any document engine
pub fn highlight_document<D: SourceDocument>(
    source: D,
    citations: &[Citation],
    config: &MatchConfig,
) -> Result<Highlighted, HighlightError> {
    let group = PageGroup::from_citations(citations, source.page_count())?;
    assemble(source, &group, config)
}

/// Highlight an in-memory PDF with the default style
pub fn highlight_bytes(
    pdf: &[u8],
    citations: &[Citation],
    config: &MatchConfig,
) -> Result<Highlighted, HighlightError> {
    if citations.is_empty() {
        return Err(HighlightError::NoValidCitations);
    }
    highlight_document(PdfSource::from_bytes(pdf)?, citations, config)
}

/// Highlights citations in PDFs stored under a data directory
#[derive(Debug, Clone)]
pub struct CitationHighlighter {
    data_dir: PathBuf,
    config: MatchConfig,
    style: HighlightStyle,
}

impl CitationHighlighter {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            config: MatchConfig::default(),
            style: HighlightStyle::default(),
        }
    }

    pub fn with_config(mut self, config: MatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_style(mut self, style: HighlightStyle) -> Self {
        self.style = style;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Path of `source_id` inside the data directory. Only plain relative
    /// names are accepted; anything that could leave the directory is
    /// reported as unavailable.
    pub fn resolve(&self, source_id: &str) -> Result<PathBuf, HighlightError> {
        let relative = Path::new(source_id);
        let plain = !source_id.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !plain {
            warn!("Rejected source id {:?}", source_id);
            return Err(HighlightError::SourceUnavailable(format!(
                "invalid source id: {}",
                source_id
            )));
        }
        Ok(self.data_dir.join(relative))
    }

    /// Highlight `citations` in the PDF named `source_id`.
    ///
    /// Empty citations fail before the file is touched. The source is read
    /// into memory and never written.
    pub fn highlight(
        &self,
        source_id: &str,
        citations: &[Citation],
    ) -> Result<Highlighted, HighlightError> {
        if citations.is_empty() {
            return Err(HighlightError::NoValidCitations);
        }

        let path = self.resolve(source_id)?;
        // The caller only gets the name back; the path stays in the log
        let source = PdfSource::open(&path)
            .map_err(|e| {
                warn!("Cannot open {}: {}", path.display(), e);
                HighlightError::SourceUnavailable(source_id.to_string())
            })?
            .with_style(self.style.clone());
        info!(
            "Highlighting {} citations in {} ({} pages)",
            citations.len(),
            source_id,
            source.page_count()
        );

        let highlighted = highlight_document(source, citations, &self.config)?;
        info!(
            "Highlighted {}: pages {:?}",
            source_id,
            highlighted.report.included_pages()
        );
        Ok(highlighted)
    }
}
