//! Report assembly and serialization.
//!
//! A report serializes as one JSON object with a fixed key order: raw
//! sections (topic declaration order), the nested analyses object, then the
//! two strategic recommendations.

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::sections::{Sections, Topic};

/// Key holding the nested per-topic analyses.
pub const ANALYSES_KEY: &str = "Análises Detalhadas";

/// Key of the prosecution-side recommendation.
pub const PROSECUTION_RECOMMENDATION_KEY: &str = "Recomendações Estratégicas para Acusação";

/// Key of the defense-side recommendation.
pub const DEFENSE_RECOMMENDATION_KEY: &str = "Recomendações Estratégicas para Defesa";

pub const PROSECUTION_RECOMMENDATION: &str = "Reforçar a credibilidade das provas e utilizar doutrina aplicável para garantir o convencimento do juiz.";

pub const DEFENSE_RECOMMENDATION: &str = "Impugnar provas duvidosas e enfatizar excludentes de ilicitude ou falta de provas concretas.";

/// Prefix of the text stored when a topic's analysis fails.
pub const ANALYSIS_ERROR_PREFIX: &str = "Erro ao gerar análise";

/// Outcome of analyzing a single topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Model output, trimmed.
    Completed(String),
    /// Human-readable failure description.
    Failed(String),
}

impl AnalysisOutcome {
    pub fn failed(detail: impl std::fmt::Display) -> Self {
        AnalysisOutcome::Failed(format!("{}: {}", ANALYSIS_ERROR_PREFIX, detail))
    }

    pub fn as_str(&self) -> &str {
        match self {
            AnalysisOutcome::Completed(text) | AnalysisOutcome::Failed(text) => text,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AnalysisOutcome::Failed(_))
    }
}

/// Analysis result for one topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicAnalysis {
    pub topic: Topic,
    pub outcome: AnalysisOutcome,
}

/// Full output for one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    sections: Sections,
    analyses: Vec<TopicAnalysis>,
}

impl Report {
    /// Merge sections and per-topic analyses.
    ///
    /// Analyses for topics without matched content are dropped, duplicates
    /// keep the first entry, and the result is ordered by topic declaration.
    pub fn assemble(sections: Sections, analyses: Vec<TopicAnalysis>) -> Self {
        let mut analyses: Vec<_> = analyses
            .into_iter()
            .filter(|a| sections.get(a.topic).is_found())
            .collect();
        analyses.sort_by_key(|a| a.topic);
        analyses.dedup_by_key(|a| a.topic);

        Self { sections, analyses }
    }

    pub fn sections(&self) -> &Sections {
        &self.sections
    }

    pub fn analyses(&self) -> &[TopicAnalysis] {
        &self.analyses
    }

    pub fn analysis(&self, topic: Topic) -> Option<&AnalysisOutcome> {
        self.analyses
            .iter()
            .find(|a| a.topic == topic)
            .map(|a| &a.outcome)
    }

    pub fn prosecution_recommendation(&self) -> &'static str {
        PROSECUTION_RECOMMENDATION
    }

    pub fn defense_recommendation(&self) -> &'static str {
        DEFENSE_RECOMMENDATION
    }
}

struct AnalysesMap<'a>(&'a [TopicAnalysis]);

impl Serialize for AnalysesMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for analysis in self.0 {
            map.serialize_entry(analysis.topic.label(), analysis.outcome.as_str())?;
        }
        map.end()
    }
}

impl Serialize for Report {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.sections.len() + 3))?;
        for section in self.sections.iter() {
            map.serialize_entry(section.topic.label(), &section.content)?;
        }
        map.serialize_entry(ANALYSES_KEY, &AnalysesMap(&self.analyses))?;
        map.serialize_entry(PROSECUTION_RECOMMENDATION_KEY, PROSECUTION_RECOMMENDATION)?;
        map.serialize_entry(DEFENSE_RECOMMENDATION_KEY, DEFENSE_RECOMMENDATION)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sections::{SectionMatcher, NOT_AVAILABLE};

    fn completed(topic: Topic, text: &str) -> TopicAnalysis {
        TopicAnalysis {
            topic,
            outcome: AnalysisOutcome::Completed(text.to_string()),
        }
    }

    #[test]
    fn test_assemble_drops_analyses_for_missing_topics() {
        let sections = SectionMatcher::new()
            .unwrap()
            .match_text("Fatos: furto simples\n\n");
        let report = Report::assemble(
            sections,
            vec![
                completed(Topic::Evidence, "não deveria aparecer"),
                completed(Topic::Facts, "análise"),
            ],
        );
        assert_eq!(report.analyses().len(), 1);
        assert!(report.analysis(Topic::Evidence).is_none());
        assert_eq!(report.analysis(Topic::Facts).unwrap().as_str(), "análise");
    }

    #[test]
    fn test_key_order() {
        let sections = SectionMatcher::new()
            .unwrap()
            .match_text("Defesa: negativa de autoria\n\nFatos: roubo\n\n");
        let report = Report::assemble(
            sections,
            vec![
                completed(Topic::DefenseArguments, "b"),
                completed(Topic::Facts, "a"),
            ],
        );
        let json = serde_json::to_string(&report).unwrap();

        let mut positions: Vec<usize> = Topic::ALL
            .iter()
            .map(|t| json.find(&format!("\"{}\"", t.label())).unwrap())
            .collect();
        positions.push(json.find(ANALYSES_KEY).unwrap());
        positions.push(json.find(PROSECUTION_RECOMMENDATION_KEY).unwrap());
        positions.push(json.find(DEFENSE_RECOMMENDATION_KEY).unwrap());
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "{json}");

        let nested = &json[json.find(ANALYSES_KEY).unwrap()..];
        assert!(nested.find("\"Fatos\"").unwrap() < nested.find("\"Argumentos da Defesa\"").unwrap());
    }

    #[test]
    fn test_empty_report_shape() {
        let report = Report::assemble(Sections::empty(), Vec::new());
        let value = serde_json::to_value(&report).unwrap();
        let obj = value.as_object().unwrap();

        assert_eq!(obj.len(), Topic::ALL.len() + 3);
        for topic in Topic::ALL {
            assert_eq!(obj[topic.label()], NOT_AVAILABLE);
        }
        assert!(obj[ANALYSES_KEY].as_object().unwrap().is_empty());
        assert_eq!(obj[PROSECUTION_RECOMMENDATION_KEY], PROSECUTION_RECOMMENDATION);
        assert_eq!(obj[DEFENSE_RECOMMENDATION_KEY], DEFENSE_RECOMMENDATION);
    }

    #[test]
    fn test_failed_outcome_text() {
        let outcome = AnalysisOutcome::failed("Connection error: refused");
        assert!(outcome.is_failed());
        assert_eq!(
            outcome.as_str(),
            "Erro ao gerar análise: Connection error: refused"
        );
    }
}
