//! Section matching for criminal case documents.
//!
//! Splits extracted document text into the fixed legal topics. Every topic
//! has its own pattern and is matched independently against the full text:
//!
//! - matching is case-insensitive and `.` crosses newlines
//! - a keyword must be immediately followed by a colon
//! - the captured span runs from after the colon (leading whitespace skipped)
//!   up to the first blank line, or to end of text
//!
//! There is no deduplication across topics. A sentence such as
//! `Alegações: ... prova: ...` can feed two topics at once, and text with
//! no blank lines captures to the end of the document.

mod topic;

pub use topic::Topic;

use regex::Regex;
use serde::Serialize;

/// Placeholder stored for a topic whose keywords never appear.
pub const NOT_AVAILABLE: &str = "Informação não disponível";

/// Content extracted for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionContent {
    /// Text captured after the topic's keyword.
    Found(String),
    /// No keyword for this topic was found.
    NotAvailable,
}

impl SectionContent {
    /// Content as emitted in reports (the placeholder when missing).
    pub fn as_str(&self) -> &str {
        match self {
            SectionContent::Found(text) => text,
            SectionContent::NotAvailable => NOT_AVAILABLE,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, SectionContent::Found(_))
    }
}

impl Serialize for SectionContent {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A (topic, content) pair produced by the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSection {
    pub topic: Topic,
    pub content: SectionContent,
}

/// Matcher output: exactly one section per topic, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sections(Vec<ExtractedSection>);

impl Sections {
    /// Sections where every topic is missing.
    pub fn empty() -> Self {
        Self(
            Topic::ALL
                .into_iter()
                .map(|topic| ExtractedSection {
                    topic,
                    content: SectionContent::NotAvailable,
                })
                .collect(),
        )
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExtractedSection> {
        self.0.iter()
    }

    /// Sections that carry matched text, in declaration order.
    pub fn found(&self) -> impl Iterator<Item = (Topic, &str)> {
        self.0.iter().filter_map(|s| match &s.content {
            SectionContent::Found(text) => Some((s.topic, text.as_str())),
            SectionContent::NotAvailable => None,
        })
    }

    pub fn get(&self, topic: Topic) -> &SectionContent {
        // Index matches declaration order by construction.
        &self.0[topic as usize].content
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Sections {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;

        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for section in &self.0 {
            map.serialize_entry(section.topic.label(), &section.content)?;
        }
        map.end()
    }
}

/// Compiled matching rule for one topic.
#[derive(Debug, Clone)]
pub struct TopicPattern {
    topic: Topic,
    regex: Regex,
}

impl TopicPattern {
    /// Build the rule for a topic from its keyword list.
    pub fn new(topic: Topic) -> Result<Self, regex::Error> {
        let keywords = topic
            .keywords()
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let regex = Regex::new(&format!(r"(?is)(?:{keywords}):\s*(.*?)(?:\n\n|\z)"))?;
        Ok(Self { topic, regex })
    }

    pub fn topic(&self) -> Topic {
        self.topic
    }

    /// Text captured by the leftmost keyword occurrence, if any.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Applies every topic pattern to a document.
#[derive(Debug, Clone)]
pub struct SectionMatcher {
    patterns: Vec<TopicPattern>,
}

impl SectionMatcher {
    /// Compile the patterns for all topics.
    pub fn new() -> Result<Self, regex::Error> {
        let patterns = Topic::ALL
            .into_iter()
            .map(TopicPattern::new)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Split `text` into one section per topic.
    pub fn match_text(&self, text: &str) -> Sections {
        let sections = Sections(
            self.patterns
                .iter()
                .map(|pattern| ExtractedSection {
                    topic: pattern.topic(),
                    content: match pattern.capture(text) {
                        Some(span) => SectionContent::Found(span.to_string()),
                        None => SectionContent::NotAvailable,
                    },
                })
                .collect(),
        );

        tracing::debug!(
            found = sections.found().count(),
            total = sections.len(),
            "Matched document sections"
        );
        sections
    }
}
