//! Prompt composition

use crate::language;
use crate::llm::ChatMessage;
use serde::Serialize;
use std::ops::Deref;

/// Longest context prefix included in the system turn, in characters
pub const MAX_CONTEXT_CHARS: usize = 500;

const DOMAIN_INSTRUCTIONS: &str = "This description describes the renovation and other work inside the house. These include: \
- Wall design: painting, wallpapering, covering walls. \
- Ceilings: painting, paneling, installing new ceiling constructions. \
- Floors: laying new floor coverings such as parquet, laminate, tiles, carpet. \
- Sanitary: replacement or renovation of bathtubs, showers, washbasins, toilets. \
- Kitchen: replacement or renovation of kitchen furniture, appliances and worktops. \
- Electrics: replacement or renovation of wiring, sockets, light switches. \
- Heating: replacement or renovation of radiators and heating systems. \
- Other work: repairing damage to walls, ceilings or floors, fitting new fixtures and fittings. ";

/// Ordered system + user turns sent to the generation backend
///
/// Immutable once built. Equality and hashing are structural, so the value
/// doubles as part of the response cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PromptMessages(Vec<ChatMessage>);

impl PromptMessages {
    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    pub fn system(&self) -> &str {
        &self.0[0].content
    }

    pub fn user(&self) -> &str {
        &self.0[1].content
    }
}

impl Deref for PromptMessages {
    type Target = [ChatMessage];

    fn deref(&self) -> &[ChatMessage] {
        &self.0
    }
}

/// Normalize a language argument: free text is re-detected, codes lower-cased
pub fn normalize_language(language: &str) -> String {
    if language.chars().count() > 3 {
        language::detect(language, &language.to_lowercase())
    } else {
        language.to_lowercase()
    }
}

fn is_german(normalized: &str) -> bool {
    matches!(normalized, "de" | "german")
}

/// Build the instruction prompt for improving `text`
pub fn compose(language: &str, context: &str, text: &str) -> PromptMessages {
    let include_german = !is_german(&normalize_language(language));

    let mut system = format!(
        "Rule: Strictly give answer in {lang} language. \
         {domain}\
         Correct errors in the texts. Improve the texts to make them easier to read. \
         Use technical vocabulary from construction and interior design. \
         Always give your response in the selected {lang} language. \
         Do not give any explanation.\n\
         Format: 'Here is the Improved Version.'\n\nImproved: [text in {lang}]",
        lang = language,
        domain = DOMAIN_INSTRUCTIONS,
    );

    if include_german {
        system.push_str("\n\nGerman Improved: [text in German]");
    }

    let context: String = context.chars().take(MAX_CONTEXT_CHARS).collect();
    system.push_str("\n\nContext: ");
    system.push_str(&context);

    PromptMessages(vec![ChatMessage::system(system), ChatMessage::user(text)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_two_turns_in_order() {
        let prompt = compose("en", "ctx", "fix this wall");
        assert_eq!(prompt.len(), 2);
        assert_eq!(prompt[0].role, "system");
        assert_eq!(prompt[1].role, "user");
        assert_eq!(prompt.user(), "fix this wall");
        assert!(prompt.system().starts_with("Rule: Strictly give answer in en language."));
        assert!(prompt.system().contains("Improved: [text in en]"));
        assert!(prompt.system().contains("Wall design"));
    }

    #[test]
    fn test_german_gets_no_bilingual_section() {
        for lang in ["de", "DE", "De"] {
            let prompt = compose(lang, "", "Wand streichen bitte");
            assert!(!prompt.system().contains("German Improved:"), "{}", lang);
        }
    }

    #[test]
    fn test_other_languages_get_bilingual_section() {
        for lang in ["en", "fr", "it", "xx", ""] {
            let prompt = compose(lang, "", "paint the wall");
            assert!(prompt.system().contains("German Improved:"), "{}", lang);
        }
    }

    #[test]
    fn test_context_truncated_to_500_chars() {
        let context = "é".repeat(800);
        let prompt = compose("en", &context, "paint the wall");
        let tail = prompt.system().split("\n\nContext: ").nth(1).unwrap();
        assert_eq!(tail.chars().count(), MAX_CONTEXT_CHARS);
    }

    #[test]
    fn test_empty_context_segment() {
        let prompt = compose("en", "", "fix this wall");
        assert!(prompt.system().ends_with("\n\nContext: "));
    }

    #[test]
    fn test_normalize_language_codes() {
        assert_eq!(normalize_language("DE"), "de");
        assert_eq!(normalize_language("en"), "en");
    }

    proptest! {
        #[test]
        fn prop_compose_is_deterministic(
            lang in "[a-z]{2}",
            context in ".{0,600}",
            text in "[a-zA-Z ]{5,60}",
        ) {
            prop_assert_eq!(compose(&lang, &context, &text), compose(&lang, &context, &text));
        }
    }
}
