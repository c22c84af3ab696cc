//! Best-effort language detection
//!
//! Detection is a heuristic: deterministic for a given input, but short or
//! mixed-language text can be misclassified. Callers must tolerate that.

use crate::error::{ReformError, Result};
use whatlang::Lang;

/// Outcome of a detection attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Classifier produced a language
    Detected(String),
    /// Classifier failed; the fallback is used instead
    Fallback { language: String, reason: String },
}

impl Detection {
    /// Language code to use, whichever way it was obtained
    pub fn language(&self) -> &str {
        match self {
            Self::Detected(code) => code,
            Self::Fallback { language, .. } => language,
        }
    }

    pub fn into_language(self) -> String {
        match self {
            Self::Detected(code) => code,
            Self::Fallback { language, .. } => language,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }
}

/// Classify `text`, keeping the reason when falling back
pub fn detect_language(text: &str, fallback: &str) -> Detection {
    match classify(text) {
        Ok(code) => Detection::Detected(code),
        Err(ReformError::Detection(reason)) => Detection::Fallback {
            language: fallback.to_string(),
            reason,
        },
        Err(other) => Detection::Fallback {
            language: fallback.to_string(),
            reason: other.to_string(),
        },
    }
}

fn classify(text: &str) -> Result<String> {
    if !text.chars().any(char::is_alphabetic) {
        return Err(ReformError::Detection("no alphabetic characters".to_string()));
    }

    let info = whatlang::detect(text).ok_or_else(|| {
        ReformError::Detection("no language could be identified".to_string())
    })?;
    tracing::debug!(
        "Detected {:?} (confidence {:.2}, reliable: {})",
        info.lang(),
        info.confidence(),
        info.is_reliable()
    );
    Ok(iso_639_1(info.lang()).to_string())
}

/// Classify `text`, returning `fallback` on any failure
pub fn detect(text: &str, fallback: &str) -> String {
    let detection = detect_language(text, fallback);
    if let Detection::Fallback { reason, .. } = &detection {
        tracing::warn!("Language detection failed: {}", reason);
    }
    detection.into_language()
}

/// Two-letter code where one exists, otherwise the three-letter code
fn iso_639_1(lang: Lang) -> &'static str {
    match lang {
        Lang::Eng => "en",
        Lang::Deu => "de",
        Lang::Fra => "fr",
        Lang::Spa => "es",
        Lang::Ita => "it",
        Lang::Por => "pt",
        Lang::Nld => "nl",
        Lang::Pol => "pl",
        Lang::Rus => "ru",
        Lang::Ukr => "uk",
        Lang::Ces => "cs",
        Lang::Slk => "sk",
        Lang::Slv => "sl",
        Lang::Hrv => "hr",
        Lang::Srp => "sr",
        Lang::Bul => "bg",
        Lang::Ron => "ro",
        Lang::Hun => "hu",
        Lang::Ell => "el",
        Lang::Dan => "da",
        Lang::Swe => "sv",
        Lang::Nob => "no",
        Lang::Fin => "fi",
        Lang::Est => "et",
        Lang::Lav => "lv",
        Lang::Lit => "lt",
        Lang::Tur => "tr",
        Lang::Cat => "ca",
        Lang::Afr => "af",
        Lang::Ara => "ar",
        Lang::Heb => "he",
        Lang::Hin => "hi",
        Lang::Vie => "vi",
        Lang::Ind => "id",
        Lang::Jpn => "ja",
        Lang::Kor => "ko",
        Lang::Cmn => "zh",
        other => other.code(),
    }
}
