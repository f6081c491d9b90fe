//! LLM client for per-topic legal analysis.
//!
//! Supports OpenAI-compatible chat completions and the Ollama API.

mod config;
mod prompts;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use config::{LlmConfig, LlmProvider};
pub use prompts::{render_analysis_prompt, DEFAULT_ANALYSIS_PROMPT, DEFAULT_SYSTEM_ROLE};

use super::{AnalysisClient, AnalysisRequest, LlmError};

/// LLM client backed by an HTTP inference service.
pub struct LlmClient {
    config: LlmConfig,
    client: Client,
}

/// OpenAI chat completions request format.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Ollama API request format.
#[derive(Debug, Serialize)]
struct OllamaRequest<'a> {
    model: &'a str,
    system: &'a str,
    prompt: &'a str,
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama API response format.
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

impl LlmClient {
    /// Create a new LLM client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        let client = Client::builder()
            .connect_timeout(std::time::Duration::from_secs(10))
            .build()
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        Ok(Self { config, client })
    }

    /// Send one system/user exchange to the configured provider.
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        if !self.config.enabled {
            return Err(LlmError::Disabled);
        }

        let response = match self.config.provider {
            LlmProvider::OpenAI => self.call_openai(system, prompt).await?,
            LlmProvider::Ollama => self.call_ollama(system, prompt).await?,
        };

        Ok(response.trim().to_string())
    }

    /// Truncate content to configured maximum (UTF-8 safe).
    fn truncate_content<'a>(&self, text: &'a str) -> &'a str {
        if text.len() <= self.config.max_content_chars {
            return text;
        }
        let mut end = self.config.max_content_chars;
        while end > 0 && !text.is_char_boundary(end) {
            end -= 1;
        }
        &text[..end]
    }

    /// Call an OpenAI-compatible chat completions endpoint.
    async fn call_openai(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(LlmError::MissingApiKey)?;

        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let url = format!("{}/v1/chat/completions", self.config.resolved_endpoint());
        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api(format!("HTTP {}: {}", status, detail)));
        }

        let chat: ChatResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| LlmError::Parse("No choices in response".to_string()))
    }

    /// Call Ollama API with a prompt.
    async fn call_ollama(&self, system: &str, prompt: &str) -> Result<String, LlmError> {
        let request = OllamaRequest {
            model: &self.config.model,
            system,
            prompt,
            stream: false,
            options: OllamaOptions {
                temperature: self.config.temperature,
                num_predict: self.config.max_tokens,
            },
        };

        let url = format!("{}/api/generate", self.config.resolved_endpoint());
        let resp = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Connection(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(LlmError::ModelNotFound(self.config.model.clone()));
        }
        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(LlmError::Api(format!("HTTP {}: {}", status, body)));
        }

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        Ok(ollama_resp.response)
    }
}

#[async_trait]
impl AnalysisClient for LlmClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<String, LlmError> {
        let content = self.truncate_content(&request.content);
        let prompt = render_analysis_prompt(
            self.config.get_analysis_prompt(),
            request.topic.label(),
            content,
        );
        let system = request
            .system_role
            .as_deref()
            .unwrap_or_else(|| self.config.get_system_role());

        debug!(topic = %request.topic, model = %self.config.model, "Requesting analysis");
        self.complete(system, &prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::Topic;

    #[test]
    fn test_truncate_content_respects_char_boundary() {
        let config = LlmConfig {
            max_content_chars: 4,
            ..LlmConfig::default()
        };
        let client = LlmClient::new(config).unwrap();
        // "açã" is 5 bytes; byte 4 falls inside "ã".
        assert_eq!(client.truncate_content("açãx"), "aç");
        assert_eq!(client.truncate_content("abc"), "abc");
    }

    #[tokio::test]
    async fn test_disabled_client() {
        let config = LlmConfig {
            enabled: false,
            ..LlmConfig::default()
        };
        let client = LlmClient::new(config).unwrap();
        let request = AnalysisRequest::new(Topic::Facts, "texto");
        let err = client.analyze(&request).await.unwrap_err();
        assert!(matches!(err, LlmError::Disabled));
    }

    #[tokio::test]
    async fn test_missing_api_key() {
        let config = LlmConfig {
            api_key: None,
            ..LlmConfig::default()
        };
        let client = LlmClient::new(config).unwrap();
        let err = client.complete("system", "prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
    }
}
