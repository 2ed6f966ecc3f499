//! Client side of the analyze exchange: the HTTP client implementing the
//! wire contract, and the controller that owns analyzer view state.

use async_trait::async_trait;
use reqwest::Client;
use shared::{
    error::ApiError,
    protocol::{AnalysisReport, AnalyzeRequest},
};
use thiserror::Error;
use tracing::debug;

mod controller;

pub use controller::{
    explanation_line, AnalyzerController, ReportArtifact, RequestToken, ResultsView,
    VALIDATION_NOTICE,
};

/// Fallback when a non-2xx body carries no parseable `error` field.
pub const GENERIC_SERVER_ERROR: &str = "Server error";

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered non-2xx. `message` is its reported error text,
    /// or the generic fallback when the body was unusable.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// Request construction, transport, or success-body decoding failed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Seam between the controller-driven flows and the network, so the full
/// analyze cycle runs against a stub in tests.
#[async_trait]
pub trait AnalyzeBackend: Send + Sync {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisReport, ClientError>;
}

pub struct AnalyzerClient {
    http: Client,
    server_url: String,
}

impl AnalyzerClient {
    pub fn new(server_url: impl Into<String>) -> Self {
        let server_url: String = server_url.into();
        Self {
            http: Client::new(),
            server_url: server_url.trim_end_matches('/').to_string(),
        }
    }

    /// One `POST /api/analyze` exchange. Both request keys are always
    /// present on the wire; no retry, no timeout beyond the transport's.
    pub async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisReport, ClientError> {
        debug!(server_url = %self.server_url, "dispatching analyze request");
        let response = self
            .http
            .post(format!("{}/api/analyze", self.server_url))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ApiError>().await {
                Ok(body) => body.error,
                Err(_) => GENERIC_SERVER_ERROR.to_string(),
            };
            return Err(ClientError::Server {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<AnalysisReport>().await?)
    }
}

#[async_trait]
impl AnalyzeBackend for AnalyzerClient {
    async fn analyze(&self, request: &AnalyzeRequest) -> Result<AnalysisReport, ClientError> {
        AnalyzerClient::analyze(self, request).await
    }
}
