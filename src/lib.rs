//! jurisflow - criminal case document triage.
//!
//! Accepts a case document, splits its text into fixed legal topics and asks
//! a language model for a per-topic analysis, returning one combined report.
//!
//! Pipeline: [`extract`] → [`sections`] → [`analysis`] (→ [`llm`]) → [`report`].

pub mod analysis;
pub mod cli;
pub mod config;
pub mod extract;
pub mod llm;
pub mod report;
pub mod sections;
pub mod server;

pub use analysis::{AnalysisConfig, AnalysisOrchestrator};
pub use config::Settings;
pub use report::Report;
pub use sections::{SectionMatcher, Sections, Topic};
