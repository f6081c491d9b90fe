//! LLM client configuration.

use serde::{Deserialize, Serialize};

use super::prompts::{DEFAULT_ANALYSIS_PROMPT, DEFAULT_SYSTEM_ROLE};

/// LLM provider type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProvider {
    /// OpenAI-compatible chat completions API (OpenAI, Groq, Together.ai, etc.)
    #[default]
    OpenAI,
    /// Ollama API (local)
    Ollama,
}

impl LlmProvider {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "groq" | "together" => Some(Self::OpenAI),
            _ => None,
        }
    }

    /// Endpoint used when none is configured explicitly.
    pub fn default_endpoint(&self) -> &'static str {
        match self {
            LlmProvider::OpenAI => "https://api.openai.com",
            LlmProvider::Ollama => "http://localhost:11434",
        }
    }
}

/// Configuration for the analysis LLM client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Whether model analysis is enabled
    pub enabled: bool,
    /// LLM provider (openai or ollama)
    pub provider: LlmProvider,
    /// API endpoint (provider default when unset)
    pub endpoint: Option<String>,
    /// API key for OpenAI-compatible providers
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model identifier
    pub model: String,
    /// Maximum tokens in each response
    pub max_tokens: u32,
    /// Temperature for generation (0.0 - 1.0)
    pub temperature: f32,
    /// Custom system role
    pub system_role: Option<String>,
    /// Custom analysis prompt (uses {topic} and {content} placeholders)
    pub analysis_prompt: Option<String>,
    /// Maximum characters of section content to send to the model
    pub max_content_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            provider: LlmProvider::default(),
            endpoint: None,
            api_key: None,
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1500,
            temperature: 0.3,
            system_role: None,
            analysis_prompt: None,
            max_content_chars: 12000,
        }
    }
}

impl LlmConfig {
    /// Apply overrides from a variable lookup.
    ///
    /// Supported variables:
    /// - `LLM_ENABLED`: "true" or "false"
    /// - `LLM_PROVIDER`: "openai" (default), "groq", "together" or "ollama"
    /// - `LLM_ENDPOINT`: API endpoint (defaults based on provider)
    /// - `LLM_API_KEY`: API key, falling back to `OPENAI_API_KEY`
    /// - `LLM_MODEL`: Model name
    /// - `LLM_MAX_TOKENS`: Maximum tokens in response
    /// - `LLM_TEMPERATURE`: Generation temperature (0.0-1.0)
    /// - `LLM_MAX_CONTENT_CHARS`: Max section chars to send
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(val) = var("LLM_ENABLED") {
            self.enabled = val.eq_ignore_ascii_case("true") || val == "1";
        }
        if let Some(provider) = var("LLM_PROVIDER").and_then(|v| LlmProvider::parse(&v)) {
            self.provider = provider;
        }
        if let Some(endpoint) = var("LLM_ENDPOINT") {
            self.endpoint = Some(endpoint);
        }
        if let Some(key) = var("LLM_API_KEY").or_else(|| var("OPENAI_API_KEY")) {
            self.api_key = Some(key);
        }
        if let Some(val) = var("LLM_MODEL") {
            self.model = val;
        }
        if let Some(n) = var("LLM_MAX_TOKENS").and_then(|v| v.parse().ok()) {
            self.max_tokens = n;
        }
        if let Some(t) = var("LLM_TEMPERATURE").and_then(|v| v.parse().ok()) {
            self.temperature = t;
        }
        if let Some(n) = var("LLM_MAX_CONTENT_CHARS").and_then(|v| v.parse().ok()) {
            self.max_content_chars = n;
        }
        self
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = Some(endpoint.to_string());
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Endpoint without trailing slash, using the provider default when unset.
    pub fn resolved_endpoint(&self) -> &str {
        self.endpoint
            .as_deref()
            .unwrap_or_else(|| self.provider.default_endpoint())
            .trim_end_matches('/')
    }

    /// Get the system role, using custom or default.
    pub fn get_system_role(&self) -> &str {
        self.system_role.as_deref().unwrap_or(DEFAULT_SYSTEM_ROLE)
    }

    /// Get the analysis prompt, using custom or default.
    pub fn get_analysis_prompt(&self) -> &str {
        self.analysis_prompt
            .as_deref()
            .unwrap_or(DEFAULT_ANALYSIS_PROMPT)
    }
}
