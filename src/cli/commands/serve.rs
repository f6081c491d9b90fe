//! Web server command.

use console::style;

use crate::config::Settings;
use crate::extract::TextExtractor;

/// Default port when the bind address names only a host.
const DEFAULT_PORT: u16 = 8080;

/// Start the web server.
pub async fn cmd_serve(settings: &Settings, bind: &str) -> anyhow::Result<()> {
    let (host, port) = parse_bind_address(bind)?;

    for warning in settings.warnings() {
        tracing::warn!("{}", warning);
        eprintln!("{} {}", style("!").yellow(), warning);
    }

    if !TextExtractor::new().is_available() {
        tracing::warn!("pdftotext not found on PATH; every upload will fail extraction");
        eprintln!(
            "{} pdftotext not found (install poppler-utils)",
            style("!").yellow()
        );
    }

    println!(
        "{} Starting jurisflow server at http://{}:{}",
        style("→").cyan(),
        host,
        port
    );
    println!(
        "  Model: {} ({:?})",
        style(&settings.llm.model).bold(),
        settings.llm.provider
    );
    println!("  Press Ctrl+C to stop");

    crate::server::serve(settings, &host, port).await
}

/// Parse a bind address that can be:
/// - Just a port: "3030" -> 0.0.0.0:3030
/// - Just a host: "127.0.0.1" -> 127.0.0.1:8080
/// - Host and port: "127.0.0.1:3030" -> 127.0.0.1:3030
fn parse_bind_address(bind: &str) -> anyhow::Result<(String, u16)> {
    let bind = bind.trim();
    if bind.is_empty() {
        anyhow::bail!("Empty bind address");
    }

    if let Ok(port) = bind.parse::<u16>() {
        return Ok(("0.0.0.0".to_string(), port));
    }

    if let Some((host, port_str)) = bind.rsplit_once(':') {
        if let Ok(port) = port_str.parse::<u16>() {
            return Ok((host.to_string(), port));
        }
        anyhow::bail!("Invalid port in bind address: {}", bind);
    }

    Ok((bind.to_string(), DEFAULT_PORT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bind_address() {
        assert_eq!(
            parse_bind_address("3030").unwrap(),
            ("0.0.0.0".to_string(), 3030)
        );
        assert_eq!(
            parse_bind_address("127.0.0.1").unwrap(),
            ("127.0.0.1".to_string(), 8080)
        );
        assert_eq!(
            parse_bind_address("127.0.0.1:9000").unwrap(),
            ("127.0.0.1".to_string(), 9000)
        );
        assert!(parse_bind_address("localhost:http").is_err());
        assert!(parse_bind_address("  ").is_err());
    }
}
