//! Per-topic analysis orchestration.
//!
//! Turns matched sections into one analysis request per populated topic,
//! dispatches them concurrently and folds every outcome (including failures)
//! into a [`Report`]. Nothing in here returns an error: a topic whose
//! analysis fails carries an error string instead.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::llm::{AnalysisClient, AnalysisRequest, LlmError};
use crate::report::{AnalysisOutcome, Report, TopicAnalysis};
use crate::sections::Sections;

/// Orchestration settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Per-topic timeout in seconds.
    pub timeout_secs: u64,
    /// Maximum number of topics analyzed at once.
    pub max_concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 120,
            max_concurrency: 4,
        }
    }
}

impl AnalysisConfig {
    /// Apply `ANALYSIS_TIMEOUT_SECS` / `ANALYSIS_MAX_CONCURRENCY` overrides.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(n) = var("ANALYSIS_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.timeout_secs = n;
        }
        if let Some(n) = var("ANALYSIS_MAX_CONCURRENCY").and_then(|v| v.parse().ok()) {
            self.max_concurrency = n;
        }
        self
    }
}

/// Dispatches per-topic analyses and assembles the report.
#[derive(Clone)]
pub struct AnalysisOrchestrator {
    client: Arc<dyn AnalysisClient>,
    config: AnalysisConfig,
}

impl AnalysisOrchestrator {
    pub fn new(client: Arc<dyn AnalysisClient>, config: AnalysisConfig) -> Self {
        Self { client, config }
    }

    /// Analyze every populated section and build the report.
    pub async fn analyze(&self, sections: Sections) -> Report {
        let requests: Vec<AnalysisRequest> = sections
            .found()
            .map(|(topic, content)| AnalysisRequest::new(topic, content))
            .collect();

        info!(topics = requests.len(), "Dispatching topic analyses");

        // `buffered` yields in input order, so results follow topic order.
        let analyses: Vec<TopicAnalysis> = stream::iter(requests)
            .map(|request| self.analyze_topic(request))
            .buffered(self.config.max_concurrency.max(1))
            .collect()
            .await;

        let failed = analyses.iter().filter(|a| a.outcome.is_failed()).count();
        if failed > 0 {
            warn!(failed, total = analyses.len(), "Some topic analyses failed");
        }

        Report::assemble(sections, analyses)
    }

    async fn analyze_topic(&self, request: AnalysisRequest) -> TopicAnalysis {
        let topic = request.topic;
        let timeout = Duration::from_secs(self.config.timeout_secs);

        debug!(%topic, chars = request.content.len(), "Analyzing topic");
        let result = match tokio::time::timeout(timeout, self.client.analyze(&request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout(self.config.timeout_secs)),
        };

        let outcome = match result {
            Ok(text) => AnalysisOutcome::Completed(text.trim().to_string()),
            Err(e) => {
                warn!(%topic, error = %e, "Topic analysis failed");
                AnalysisOutcome::failed(e)
            }
        };

        TopicAnalysis { topic, outcome }
    }
}
