//! HTTP surface: `GET /scrape?url=...` and `GET /health`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use color_eyre::eyre::{Result, eyre};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use linkpeek_core::scrape;
use linkpeek_fetcher::PageProvider;
use linkpeek_shared::{ExtractOptions, LinkpeekError};

/// Shared, read-only state handed to every request.
pub(crate) struct ServerState<P> {
    pub provider: P,
    pub options: ExtractOptions,
}

#[derive(Debug, Deserialize)]
struct ScrapeParams {
    url: Option<String>,
}

/// Build the application router over any page provider.
pub(crate) fn router<P: PageProvider + 'static>(state: Arc<ServerState<P>>) -> Router {
    Router::new()
        .route("/scrape", get(scrape_handler::<P>))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Bind `host:port` and serve until Ctrl+C.
pub(crate) async fn serve<P: PageProvider + 'static>(
    state: ServerState<P>,
    host: &str,
    port: u16,
) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("failed to bind to {addr}: {e}"))?;

    let local: SocketAddr = listener.local_addr()?;
    info!(%local, provider = state.provider.name(), mode = %state.options.mode, "server listening");
    println!("Listening on http://{local}/");
    println!("Press Ctrl+C to stop.");

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| eyre!("server error: {e}"))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[instrument(skip_all, name = "http_scrape")]
async fn scrape_handler<P: PageProvider + 'static>(
    State(state): State<Arc<ServerState<P>>>,
    Query(params): Query<ScrapeParams>,
) -> Response {
    match scrape(&state.provider, params.url.as_deref(), &state.options).await {
        Ok(record) => Json(record).into_response(),
        Err(e) => ApiError(e).into_response(),
    }
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// A pipeline error rendered as `{"error": "<message>"}`.
struct ApiError(LinkpeekError);

fn status_for(err: &LinkpeekError) -> StatusCode {
    match err {
        e if e.is_input_error() => StatusCode::BAD_REQUEST,
        LinkpeekError::InsufficientMetadata { .. } => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
