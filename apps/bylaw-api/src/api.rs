//! API handlers for the bylaw citation server

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared_types::HighlightRequest;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

/// Lists the source pages present in a highlighted PDF, comma-separated
pub const HIGHLIGHTED_PAGES_HEADER: &str = "x-highlighted-pages";

#[derive(Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Handler: GET /
pub async fn handle_root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Server is running",
    })
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "running",
        service: "bylaw-api",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Download name for the highlighted copy of `pdf_name`
fn attachment_name(pdf_name: &str) -> String {
    let base = Path::new(pdf_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("document.pdf");
    let safe: String = base
        .chars()
        .map(|c| if c == '"' || c.is_control() { '_' } else { c })
        .collect();
    format!("highlighted_{}", safe)
}

/// Handler: POST /api/highlight
pub async fn handle_highlight(
    State(state): State<AppState>,
    Json(req): Json<HighlightRequest>,
) -> Result<Response, ApiError> {
    info!(
        "Highlight request: pdf={}, citations={}",
        req.pdf_name,
        req.citations.len()
    );
    debug!("Citations: {:?}", req.citations);

    let highlighter = Arc::clone(&state.highlighter);
    let pdf_name = req.pdf_name.clone();
    let citations = req.citations;

    let result = tokio::time::timeout(
        Duration::from_millis(state.timeout_ms),
        tokio::task::spawn_blocking(move || highlighter.highlight(&pdf_name, &citations)),
    )
    .await;

    let highlighted = match result {
        Ok(Ok(outcome)) => outcome?,
        Ok(Err(join_error)) => {
            return Err(ApiError::Internal(format!(
                "Highlight task panicked: {}",
                join_error
            )));
        }
        Err(_timeout) => return Err(ApiError::Timeout(state.timeout_ms)),
    };

    let pages = highlighted
        .report
        .included_pages()
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(",");
    info!("Returning {} with pages [{}]", req.pdf_name, pages);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", attachment_name(&req.pdf_name)),
            ),
            (HeaderName::from_static(HIGHLIGHTED_PAGES_HEADER), pages),
        ],
        highlighted.bytes,
    )
        .into_response())
}
