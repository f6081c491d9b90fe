//! Offline analysis of a local document.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use console::style;

use crate::analysis::AnalysisOrchestrator;
use crate::config::Settings;
use crate::extract::{sniff_mime_type, DocumentExtractor, TextExtractor};
use crate::llm::LlmClient;
use crate::sections::SectionMatcher;

/// Analyze a PDF or plain-text file and print the result as JSON.
pub async fn cmd_analyze(
    settings: &Settings,
    file: &Path,
    sections_only: bool,
    pretty: bool,
) -> anyhow::Result<()> {
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    let extractor = TextExtractor::new().with_timeout(settings.server.extract_timeout());
    let text = document_text(&extractor, bytes).await?;

    let sections = SectionMatcher::new()?.match_text(&text);
    eprintln!(
        "{} {} of {} sections found in {}",
        style("→").cyan(),
        sections.found().count(),
        sections.len(),
        file.display()
    );

    let output = if sections_only {
        to_json(&sections, pretty)?
    } else {
        for warning in settings.warnings() {
            tracing::warn!("{}", warning);
        }
        let client = LlmClient::new(settings.llm.clone())?;
        let orchestrator = AnalysisOrchestrator::new(Arc::new(client), settings.analysis.clone());
        let report = orchestrator.analyze(sections).await;

        let failed = report
            .analyses()
            .iter()
            .filter(|a| a.outcome.is_failed())
            .count();
        if failed > 0 {
            eprintln!(
                "  {} {} of {} analyses failed",
                style("✗").red(),
                failed,
                report.analyses().len()
            );
        }
        to_json(&report, pretty)?
    };

    println!("{}", output);
    Ok(())
}

/// PDFs go through pdftotext; anything else must already be UTF-8 text.
async fn document_text(extractor: &TextExtractor, bytes: Vec<u8>) -> anyhow::Result<String> {
    match sniff_mime_type(&bytes) {
        Some("application/pdf") => Ok(extractor
            .extract(bytes)
            .await
            .context("Failed to extract PDF text")?),
        Some(other) => anyhow::bail!("Unsupported file type: {}", other),
        None => String::from_utf8(bytes).context("File is neither a PDF nor UTF-8 text"),
    }
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_plain_text_passes_through() {
        let text = document_text(&TextExtractor::new(), b"Fatos: furto\n\n".to_vec())
            .await
            .unwrap();
        assert_eq!(text, "Fatos: furto\n\n");
    }

    #[tokio::test]
    async fn test_binary_non_pdf_is_rejected() {
        let png = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
        let extractor = TextExtractor::new();
        assert!(document_text(&extractor, png).await.is_err());

        assert!(document_text(&extractor, vec![0xff, 0xfe, 0x00, 0xd8])
            .await
            .is_err());
    }
}
