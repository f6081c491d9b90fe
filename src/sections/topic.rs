//! The fixed set of legal topics a case document is split into.

use serde::{Serialize, Serializer};

/// A legal-document section label.
///
/// Declaration order is the order topics appear in every report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Topic {
    /// Parties involved: defendant, victim, accused.
    Parties,
    /// Narrative of the facts.
    Facts,
    /// Evidence on record.
    Evidence,
    /// Prosecution (public ministry) arguments.
    ProsecutionArguments,
    /// Defense arguments and allegations.
    DefenseArguments,
    /// Case law and applied doctrine.
    CaseLaw,
    /// Interlocutory decisions, injunctions, precautionary measures.
    InterlocutoryDecisions,
}

impl Topic {
    /// All topics in declaration order.
    pub const ALL: [Topic; 7] = [
        Topic::Parties,
        Topic::Facts,
        Topic::Evidence,
        Topic::ProsecutionArguments,
        Topic::DefenseArguments,
        Topic::CaseLaw,
        Topic::InterlocutoryDecisions,
    ];

    /// Label used as the JSON key and in analysis prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Topic::Parties => "Identificação das Partes",
            Topic::Facts => "Fatos",
            Topic::Evidence => "Elementos de Prova",
            Topic::ProsecutionArguments => "Argumentos da Acusação",
            Topic::DefenseArguments => "Argumentos da Defesa",
            Topic::CaseLaw => "Jurisprudência e Doutrina",
            Topic::InterlocutoryDecisions => "Decisões Interlocutórias",
        }
    }

    /// Trigger keywords. A keyword only counts when immediately followed by a colon.
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Topic::Parties => &["partes", "envolvidos", "réu", "acusado", "vítima"],
            Topic::Facts => &["fatos", "ocorrências"],
            Topic::Evidence => &["provas", "prova", "evidências"],
            Topic::ProsecutionArguments => &["acusação", "fundamento do mp"],
            Topic::DefenseArguments => &["defesa", "alegações"],
            Topic::CaseLaw => &["jurisprudência", "doutrina aplicada"],
            Topic::InterlocutoryDecisions => {
                &["decisão interlocutória", "liminar", "medida cautelar"]
            }
        }
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Topic {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
