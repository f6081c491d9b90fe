//! Process configuration.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! environment variables. They are built once at startup and passed down
//! explicitly; nothing below `main` reads the environment.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analysis::AnalysisConfig;
use crate::llm::LlmConfig;

/// Development-only bearer token used when `AUTH_TOKEN` is unset.
pub const DEFAULT_AUTH_TOKEN: &str = "meu_novo_token_secreto";

/// Environment variable naming a config file.
pub const CONFIG_ENV_VAR: &str = "JURISFLOW_CONFIG";

/// Errors loading the settings file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address (`port`, `host` or `host:port`).
    pub bind: String,
    /// Maximum accepted request body size in bytes.
    pub max_upload_bytes: usize,
    /// Upper bound on one pdftotext run, in seconds.
    pub extract_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            extract_timeout_secs: 60,
        }
    }
}

impl ServerConfig {
    pub fn extract_timeout(&self) -> Duration {
        Duration::from_secs(self.extract_timeout_secs)
    }
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Shared bearer token required on uploads.
    pub auth_token: String,
    pub server: ServerConfig,
    pub llm: LlmConfig,
    pub analysis: AnalysisConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            auth_token: DEFAULT_AUTH_TOKEN.to_string(),
            server: ServerConfig::default(),
            llm: LlmConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the process environment.
    ///
    /// When `path` is `None`, `JURISFLOW_CONFIG` is consulted.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV_VAR).map(PathBuf::from);
        let base = match path.or(env_path.as_deref()) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        Ok(base.with_overrides(|key| std::env::var(key).ok()))
    }

    /// Parse a TOML settings file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply overrides from a variable lookup.
    ///
    /// Supported variables: `AUTH_TOKEN`, `JURISFLOW_BIND`,
    /// `JURISFLOW_MAX_UPLOAD_BYTES`, `JURISFLOW_EXTRACT_TIMEOUT_SECS`, plus the `LLM_*` and `ANALYSIS_*` sets.
    pub fn with_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = var("AUTH_TOKEN") {
            self.auth_token = token;
        }
        if let Some(bind) = var("JURISFLOW_BIND") {
            self.server.bind = bind;
        }
        if let Some(n) = var("JURISFLOW_MAX_UPLOAD_BYTES").and_then(|v| v.parse().ok()) {
            self.server.max_upload_bytes = n;
        }
        if let Some(n) = var("JURISFLOW_EXTRACT_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            self.server.extract_timeout_secs = n;
        }
        self.llm = self.llm.with_overrides(&var);
        self.analysis = self.analysis.with_overrides(&var);
        self
    }

    /// Problems worth warning about at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.auth_token == DEFAULT_AUTH_TOKEN {
            warnings.push(
                "AUTH_TOKEN is not set; using the development default token".to_string(),
            );
        }
        if self.auth_token.is_empty() {
            warnings.push("AUTH_TOKEN is empty; every upload will be rejected".to_string());
        }
        if self.llm.enabled
            && self.llm.provider == crate::llm::LlmProvider::OpenAI
            && self.llm.api_key.as_deref().map_or(true, str::is_empty)
        {
            warnings.push(
                "No LLM API key configured (OPENAI_API_KEY / LLM_API_KEY); analyses will fail"
                    .to_string(),
            );
        }
        warnings
    }
}
