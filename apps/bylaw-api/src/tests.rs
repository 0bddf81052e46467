//! Integration tests for the bylaw citation server API

use std::fs;

use axum::http::StatusCode;
use axum_test::TestServer;
use highlight_core::testing::{fixture_pdf, page_count};
use highlight_core::CitationHighlighter;
use serde_json::json;
use tempfile::TempDir;

use crate::router;
use crate::state::AppState;

const PAGES: [&[&str]; 5] = [
    &["Part 1 General"],
    &["Vehicles must carry valid registration."],
    &["Excessive noise is prohibited after 11pm.", "Sources of air pollution must be registered."],
    &["Dogs must be leashed."],
    &["Part 5 Penalties"],
];

/// Create a test server over a data directory holding `bylaw.pdf`
fn create_test_server() -> (TestServer, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("bylaw.pdf"), fixture_pdf(&PAGES)).unwrap();

    let state = AppState::new(CitationHighlighter::new(dir.path()), 10_000);
    (TestServer::new(router(state)).unwrap(), dir)
}

#[tokio::test]
async fn test_root_reports_running() {
    let (server, _dir) = create_test_server();
    let response = server.get("/").await;
    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["message"], "Server is running");
}

#[tokio::test]
async fn test_health_returns_200() {
    let (server, _dir) = create_test_server();
    let response = server.get("/health").await;
    response.assert_status_ok();

    let json = response.json::<serde_json::Value>();
    assert_eq!(json["status"], "running");
    assert_eq!(json["service"], "bylaw-api");
}

#[tokio::test]
async fn test_highlight_returns_pdf_attachment() {
    let (server, _dir) = create_test_server();
    let response = server
        .post("/api/highlight")
        .json(&json!({
            "pdf_name": "bylaw.pdf",
            "citations": [
                {"page": 4, "snippet": "Dogs must be leashed."},
                {"page": 2, "snippet": "Vehicles must carry valid registration."},
                {"page": 5, "snippet": "not on this page at all"}
            ]
        }))
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(
        response.header("content-disposition"),
        "attachment; filename=\"highlighted_bylaw.pdf\""
    );
    assert_eq!(response.header("x-highlighted-pages"), "2,4");
    assert_eq!(page_count(response.as_bytes()), 2);
}

#[tokio::test]
async fn test_empty_citations_are_bad_request() {
    let (server, _dir) = create_test_server();
    let response = server
        .post("/api/highlight")
        .json(&json!({"pdf_name": "bylaw.pdf", "citations": []}))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["success"], false);
    assert_eq!(json["code"], "NO_VALID_CITATIONS");
    assert_eq!(json["error"], "No valid citations found");
}

#[tokio::test]
async fn test_unmatched_citations_share_the_invalid_message() {
    let (server, _dir) = create_test_server();
    let response = server
        .post("/api/highlight")
        .json(&json!({
            "pdf_name": "bylaw.pdf",
            "citations": [{"page": 1, "snippet": "zoning variance procedures"}]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["error"], "No valid citations found");
}

#[tokio::test]
async fn test_out_of_range_pages_are_bad_request() {
    let (server, _dir) = create_test_server();
    let response = server
        .post("/api/highlight")
        .json(&json!({
            "pdf_name": "bylaw.pdf",
            "citations": [{"page": 0, "snippet": "Part"}, {"page": 99, "snippet": "Part"}]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_pdf_is_not_found() {
    let (server, _dir) = create_test_server();
    let response = server
        .post("/api/highlight")
        .json(&json!({
            "pdf_name": "absent.pdf",
            "citations": [{"page": 1, "snippet": "anything"}]
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let json = response.json::<serde_json::Value>();
    assert_eq!(json["code"], "SOURCE_NOT_FOUND");
    assert_eq!(json["error"], "Source not found: absent.pdf");
}

#[tokio::test]
async fn test_not_found_body_hides_data_dir() {
    let (server, dir) = create_test_server();
    let response = server
        .post("/api/highlight")
        .json(&json!({
            "pdf_name": "absent.pdf",
            "citations": [{"page": 1, "snippet": "anything"}]
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.text();
    let data_dir = dir.path().to_string_lossy();
    assert!(!body.contains(data_dir.as_ref()), "body leaks data dir: {}", body);
    assert!(!body.contains("os error"), "body leaks io error: {}", body);
}

#[tokio::test]
async fn test_path_traversal_is_rejected() {
    let (server, _dir) = create_test_server();
    let response = server
        .post("/api/highlight")
        .json(&json!({
            "pdf_name": "../bylaw.pdf",
            "citations": [{"page": 1, "snippet": "Part 1 General"}]
        }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_malformed_body_is_rejected() {
    let (server, _dir) = create_test_server();
    let response = server
        .post("/api/highlight")
        .json(&json!({"citations": []}))
        .await;

    assert!(response.status_code().is_client_error());
}
