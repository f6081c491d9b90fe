//! Default prompts for per-topic legal analysis.

/// System role sent with every analysis request.
pub const DEFAULT_SYSTEM_ROLE: &str =
    "Você é um assistente jurídico experiente, especializado em análise de processos criminais.";

/// Default prompt for analyzing one section of a case document.
///
/// Placeholders: `{topic}` (section label) and `{content}` (captured text).
pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"Realize uma análise jurídica detalhada sobre o tema '{topic}'.
Considere os seguintes aspectos:
- Pontos fortes e fracos da acusação e da defesa
- Fatos importantes a serem destacados
- Artigos do Código Penal relacionados ao tema
- Recomendações estratégicas para a acusação
- Recomendações estratégicas para a defesa

Conteúdo para análise:
{content}"#;

/// Fill the analysis template for one topic.
pub fn render_analysis_prompt(template: &str, topic: &str, content: &str) -> String {
    template
        .replace("{topic}", topic)
        .replace("{content}", content)
}
