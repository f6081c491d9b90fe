//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod analyze;
mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Settings;

#[derive(Parser)]
#[command(name = "jurisflow")]
#[command(about = "Criminal case document sectioning and legal analysis")]
#[command(version)]
pub struct Cli {
    /// Config file path (TOML). Falls back to JURISFLOW_CONFIG.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Bind address: port, host, or host:port (overrides config)
        #[arg(short, long)]
        bind: Option<String>,
    },

    /// Analyze a local PDF or text file and print the report as JSON
    Analyze {
        /// Document to analyze
        file: PathBuf,
        /// Only split into sections; do not call the model
        #[arg(long)]
        sections_only: bool,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

/// Parse arguments, load settings and run the selected command.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Serve { bind } => {
            let bind = bind.unwrap_or_else(|| settings.server.bind.clone());
            serve::cmd_serve(&settings, &bind).await
        }
        Commands::Analyze {
            file,
            sections_only,
            pretty,
        } => analyze::cmd_analyze(&settings, &file, sections_only, pretty).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_analyze() {
        let cli = Cli::try_parse_from([
            "jurisflow",
            "analyze",
            "processo.pdf",
            "--sections-only",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(
            cli.command,
            Commands::Analyze { sections_only: true, pretty: false, .. }
        ));
    }
}
