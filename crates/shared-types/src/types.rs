/// A claim that a page of a source document contains a piece of text.
///
/// Produced by the retrieval step and passed unchanged to the highlighter.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Citation {
    /// Document the citation was retrieved from, if known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// 1-indexed page number. Signed so that out-of-range values still
    /// deserialize and can be dropped by the highlighter instead of the parser.
    pub page: i64,
    #[serde(default)]
    pub snippet: String,
}

impl Citation {
    pub fn new(page: i64, snippet: impl Into<String>) -> Self {
        Self {
            source: None,
            page,
            snippet: snippet.into(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// Request body for generating a highlighted PDF
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct HighlightRequest {
    /// File name of the source PDF inside the data directory
    pub pdf_name: String,
    #[serde(default)]
    pub citations: Vec<Citation>,
}
