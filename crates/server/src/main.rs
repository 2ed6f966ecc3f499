use std::net::SocketAddr;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::{
    error::ApiError,
    protocol::{AnalysisReport, AnalyzeRequest},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer};
use tracing::info;

mod config;

use config::load_settings;

// Analysis inputs are pasted article text; anything beyond this is abuse.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    let settings = load_settings();
    let app = build_router();

    let addr: SocketAddr = settings.bind_addr.parse()?;
    info!(%addr, "analyzer server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router() -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/analyze", post(api_analyze))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
}

async fn healthz() -> &'static str {
    "ok"
}

/// A missing or malformed body is treated as empty input, so it falls into
/// the same validation rejection as a blank submission.
async fn api_analyze(
    body: Option<Json<AnalyzeRequest>>,
) -> Result<Json<AnalysisReport>, (StatusCode, Json<ApiError>)> {
    let request = body.map(|Json(req)| req).unwrap_or_default();
    let text = request.text.trim();
    let url = request.url.trim();

    if text.is_empty() && url.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("Please provide text or a URL to analyze.")),
        ));
    }

    let combined_text = if text.is_empty() {
        format!("URL only: {url}")
    } else {
        text.to_string()
    };
    let report = analysis::analyze_text(&combined_text, (!url.is_empty()).then_some(url));
    Ok(Json(report))
}
