//! Bylaw citation server
//!
//! Serves highlighted excerpts of bylaw PDFs: given a document name and the
//! citations an answer was built from, returns a PDF with only the cited
//! pages, the cited text highlighted.
//!
//! Match tuning and highlight appearance are read from `HIGHLIGHT_*`
//! environment variables (see `highlight_core::config`); a `.env` file is
//! loaded first when present.

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    routing::{get, post},
    Router,
};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use highlight_core::{CitationHighlighter, HighlightStyle, MatchConfig};

mod api;
mod error;
mod state;
#[cfg(test)]
mod tests;

use api::{handle_health, handle_highlight, handle_root};
use state::AppState;

/// Command-line arguments for the bylaw citation server
#[derive(Parser, Debug)]
#[command(name = "bylaw-api")]
#[command(about = "Returns bylaw PDF excerpts with cited text highlighted")]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value = "8000")]
    port: u16,

    /// Host address to bind to
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Directory holding the source PDFs
    #[arg(long, env = "BYLAW_DATA_DIR", default_value = "data")]
    data_dir: PathBuf,

    /// Highlight timeout in milliseconds
    #[arg(long, env = "HIGHLIGHT_TIMEOUT_MS", default_value = "30000")]
    timeout_ms: u64,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Build the application router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handle_root))
        .route("/health", get(handle_health))
        .route("/api/highlight", post(handle_highlight))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(log_level.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MatchConfig::from_env()?;
    let style = HighlightStyle::from_env()?;
    info!(
        "Match config: min_part_length={}, min_window_size={}, delimiter_split={}",
        config.min_part_length, config.min_window_size, config.delimiter_split
    );

    if !args.data_dir.is_dir() {
        tracing::warn!("Data directory {} does not exist", args.data_dir.display());
    }

    let highlighter = CitationHighlighter::new(&args.data_dir)
        .with_config(config)
        .with_style(style);
    let state = AppState::new(highlighter, args.timeout_ms);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("Server listening on http://{}", addr);
    info!("Serving PDFs from {}", args.data_dir.display());
    info!("Highlight timeout: {}ms", args.timeout_ms);

    axum::serve(listener, app).await?;

    Ok(())
}
