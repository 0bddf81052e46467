use thiserror::Error;

#[derive(Error, Debug)]
pub enum HighlightError {
    /// Citation list was empty, or every citation pointed outside the document
    #[error("No valid citations found")]
    NoValidCitations,

    /// Citations pointed at real pages but no snippet could be located
    #[error("No valid citations found")]
    NoMatchFound { pages_attempted: usize },

    #[error("Source document unavailable: {0}")]
    SourceUnavailable(String),

    #[error("PDF operation failed: {0}")]
    OperationError(String),
}

impl HighlightError {
    /// Both "nothing to highlight" conditions look the same to a caller.
    pub fn is_nothing_to_highlight(&self) -> bool {
        matches!(
            self,
            HighlightError::NoValidCitations | HighlightError::NoMatchFound { .. }
        )
    }
}
