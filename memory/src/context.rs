//! Prompt and local fallback for contextual summaries.

use crate::text::truncate_chars;

/// Marker the model emits when the context has nothing relevant.
const NO_CONTEXT: &str = "No relevant context found";
/// Fragments quoted by the local fallback are cut to this many characters.
const FALLBACK_FRAGMENT_CHARS: usize = 50;

/// Memory gathered for one contextual summary.
#[derive(Debug, Default, Clone)]
pub(crate) struct ContextSources {
    /// Most recent short-term entries, oldest first, as `Topic: ...` lines.
    pub history: Vec<String>,
    /// Ranked long-term chunks as `### Topic: ...` blocks.
    pub relevant: Vec<String>,
    /// Query of the most recent raw exchange.
    pub last_query: Option<String>,
}

impl ContextSources {
    pub(crate) fn is_empty(&self) -> bool {
        self.history.is_empty() && self.relevant.is_empty()
    }
}

pub(crate) fn contextual_prompt(query: &str, lang: &str, sources: &ContextSources) -> String {
    let mut parts = Vec::new();
    if !sources.history.is_empty() {
        parts.push(format!(
            "Recent conversation history:\n{}",
            sources.history.join("\n")
        ));
    }
    if !sources.relevant.is_empty() {
        parts.push(format!(
            "Semantically relevant historical medical information:\n{}",
            sources.relevant.join("\n")
        ));
    }

    format!(
        "{}\nCurrent user query: \"{query}\"\n\nAvailable context information:\n{}\n\nLanguage context: {lang}",
        include_str!("../prompts/contextual.txt"),
        parts.join("\n"),
    )
}

/// Maps the model's answer to the returned summary; the no-context marker becomes empty.
pub(crate) fn interpret_summary(output: &str) -> String {
    let summary = output.trim();
    if summary.contains(NO_CONTEXT) {
        String::new()
    } else {
        summary.to_owned()
    }
}

/// Builds a summary without a model from truncated fragments of what was gathered.
pub(crate) fn fallback_summary(sources: &ContextSources) -> String {
    let mut summary = Vec::new();
    if let Some(latest) = sources.history.last() {
        let asked = sources.last_query.as_deref().unwrap_or_default();
        summary.push(format!(
            "Recent conversation: User asked about {}... and received a response about {}...",
            truncate_chars(asked, FALLBACK_FRAGMENT_CHARS),
            truncate_chars(latest, FALLBACK_FRAGMENT_CHARS),
        ));
    }
    if !sources.relevant.is_empty() {
        summary.push(format!(
            "Relevant medical information: {} chunks found covering various medical topics.",
            sources.relevant.len()
        ));
    }
    summary.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sources() -> ContextSources {
        ContextSources {
            history: vec!["Topic: Fever\nDrink fluids.".into()],
            relevant: vec!["### Topic: Rash\nUse cream.".into(), "### Topic: Cough\nHoney.".into()],
            last_query: Some("What about my fever?".into()),
        }
    }

    #[test]
    fn prompt_includes_both_sources() {
        let prompt = contextual_prompt("Is it serious?", "EN", &sources());
        assert!(prompt.contains("Current user query: \"Is it serious?\""));
        assert!(prompt.contains("Recent conversation history:\nTopic: Fever"));
        assert!(prompt.contains("### Topic: Cough\nHoney."));
        assert!(prompt.ends_with("Language context: EN"));
    }

    #[test]
    fn no_context_marker_maps_to_empty() {
        assert_eq!(interpret_summary("  No relevant context found.  "), "");
        assert_eq!(interpret_summary(" The patient has a fever. "), "The patient has a fever.");
    }

    #[test]
    fn fallback_quotes_truncated_fragments() {
        let summary = fallback_summary(&sources());
        assert_eq!(
            summary,
            "Recent conversation: User asked about What about my fever?... and received a response about Topic: Fever\nDrink fluids.... Relevant medical information: 2 chunks found covering various medical topics."
        );
        assert_eq!(fallback_summary(&ContextSources::default()), "");
    }
}
