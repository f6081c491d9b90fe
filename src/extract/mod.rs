//! Text extraction from uploaded documents using pdftotext.
//!
//! The file type is sniffed from content (magic bytes), never from the
//! client-supplied filename or content type.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;

/// Errors that can occur during text extraction.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("External tool not found: {0}")]
    ToolNotFound(String),

    #[error("Extraction failed: {0}")]
    ExtractionFailed(String),

    #[error("Extraction timed out after {0:?}")]
    Timeout(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts an uploaded binary document into plain text.
#[async_trait]
pub trait DocumentExtractor: Send + Sync {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractionError>;
}

/// Handle command output, extracting stdout on success or returning appropriate error.
fn handle_cmd_output(
    result: std::io::Result<std::process::Output>,
    tool_name: &str,
) -> Result<String, ExtractionError> {
    match result {
        Ok(output) if output.status.success() => {
            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        }
        Ok(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(ExtractionError::ExtractionFailed(format!(
                "{} failed: {}",
                tool_name,
                stderr.trim()
            )))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ExtractionError::ToolNotFound(
            format!("{} (install poppler-utils)", tool_name),
        )),
        Err(e) => Err(ExtractionError::Io(e)),
    }
}

/// Detect the MIME type of a document from its leading bytes.
pub fn sniff_mime_type(bytes: &[u8]) -> Option<&'static str> {
    infer::get(bytes).map(|kind| kind.mime_type())
}

/// Accept only content that sniffs as a PDF.
fn ensure_pdf(bytes: &[u8]) -> Result<(), ExtractionError> {
    match sniff_mime_type(bytes) {
        Some("application/pdf") => Ok(()),
        Some(other) => Err(ExtractionError::UnsupportedFileType(other.to_string())),
        None => Err(ExtractionError::UnsupportedFileType(
            "unknown (expected application/pdf)".to_string(),
        )),
    }
}

/// PDF text extractor backed by Poppler's `pdftotext`.
#[derive(Debug, Clone)]
pub struct TextExtractor {
    binary: String,
    timeout: Duration,
}

impl Default for TextExtractor {
    fn default() -> Self {
        Self {
            binary: "pdftotext".to_string(),
            timeout: Duration::from_secs(60),
        }
    }
}

impl TextExtractor {
    /// Create a new text extractor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific pdftotext binary.
    pub fn with_binary(mut self, binary: &str) -> Self {
        self.binary = binary.to_string();
        self
    }

    /// Kill pdftotext if it runs longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether the pdftotext binary can be found on `PATH`.
    pub fn is_available(&self) -> bool {
        which::which(&self.binary).is_ok()
    }
}

#[async_trait]
impl DocumentExtractor for TextExtractor {
    async fn extract(&self, bytes: Vec<u8>) -> Result<String, ExtractionError> {
        ensure_pdf(&bytes)?;

        let file = tempfile::Builder::new().suffix(".pdf").tempfile()?;
        tokio::fs::write(file.path(), &bytes).await?;

        let mut cmd = Command::new(&self.binary);
        cmd.args(["-enc", "UTF-8"])
            .arg(file.path())
            .arg("-") // Output to stdout
            .kill_on_drop(true);

        // Dropping the output future on timeout kills the child.
        let result = tokio::time::timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ExtractionError::Timeout(self.timeout))?;

        let text = handle_cmd_output(result, &self.binary)?;
        tracing::debug!(chars = text.len(), "Extracted PDF text");
        Ok(text)
    }
}
