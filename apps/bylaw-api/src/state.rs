use std::sync::Arc;

use highlight_core::CitationHighlighter;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub highlighter: Arc<CitationHighlighter>,
    /// Highlight timeout in milliseconds
    pub timeout_ms: u64,
}

impl AppState {
    pub fn new(highlighter: CitationHighlighter, timeout_ms: u64) -> Self {
        Self {
            highlighter: Arc::new(highlighter),
            timeout_ms,
        }
    }
}
