//! HTTP surface for document analysis.
//!
//! - `POST /upload_arquivo`: bearer-authenticated PDF upload, returns the report
//! - `GET /health`: liveness probe

mod auth;
mod error;
mod handlers;
mod routes;

pub use error::ApiError;
pub use handlers::FILE_FIELD;
pub use routes::create_router;

use std::net::SocketAddr;
use std::sync::Arc;

use crate::analysis::AnalysisOrchestrator;
use crate::config::Settings;
use crate::extract::{DocumentExtractor, TextExtractor};
use crate::llm::LlmClient;
use crate::sections::SectionMatcher;

/// Shared state for the web server. Read-only after startup.
#[derive(Clone)]
pub struct AppState {
    pub auth_token: Arc<str>,
    pub extractor: Arc<dyn DocumentExtractor>,
    pub matcher: Arc<SectionMatcher>,
    pub orchestrator: AnalysisOrchestrator,
}

impl AppState {
    /// Build the production state: pdftotext extraction and an HTTP LLM client.
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = LlmClient::new(settings.llm.clone())?;
        let orchestrator = AnalysisOrchestrator::new(Arc::new(client), settings.analysis.clone());
        let extractor = TextExtractor::new().with_timeout(settings.server.extract_timeout());
        Self::with_components(&settings.auth_token, Arc::new(extractor), orchestrator)
    }

    /// Build state from explicit collaborators.
    pub fn with_components(
        auth_token: &str,
        extractor: Arc<dyn DocumentExtractor>,
        orchestrator: AnalysisOrchestrator,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            auth_token: Arc::from(auth_token),
            extractor,
            matcher: Arc::new(SectionMatcher::new()?),
            orchestrator,
        })
    }
}

/// Start the web server and run until Ctrl+C.
pub async fn serve(settings: &Settings, host: &str, port: u16) -> anyhow::Result<()> {
    let state = AppState::new(settings)?;
    let app = create_router(state, settings.server.max_upload_bytes);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    tracing::info!("Starting server at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
