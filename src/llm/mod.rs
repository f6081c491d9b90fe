//! LLM integration for per-topic legal analysis.
//!
//! The orchestrator only sees the [`AnalysisClient`] trait; [`LlmClient`]
//! is the HTTP-backed implementation.

mod client;

use async_trait::async_trait;
use thiserror::Error;

pub use client::{
    render_analysis_prompt, LlmClient, LlmConfig, LlmProvider, DEFAULT_ANALYSIS_PROMPT,
    DEFAULT_SYSTEM_ROLE,
};

use crate::sections::Topic;

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("No API key configured")]
    MissingApiKey,

    #[error("Timed out after {0}s")]
    Timeout(u64),

    #[error("LLM is disabled")]
    Disabled,
}

/// One analysis request: a topic and the text captured for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub topic: Topic,
    pub content: String,
    /// Overrides the client's configured system role.
    pub system_role: Option<String>,
}

impl AnalysisRequest {
    pub fn new(topic: Topic, content: impl Into<String>) -> Self {
        Self {
            topic,
            content: content.into(),
            system_role: None,
        }
    }

    pub fn with_system_role(mut self, role: impl Into<String>) -> Self {
        self.system_role = Some(role.into());
        self
    }
}

/// A service that turns a topic's content into analysis text.
#[async_trait]
pub trait AnalysisClient: Send + Sync {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, LlmError>;
}
