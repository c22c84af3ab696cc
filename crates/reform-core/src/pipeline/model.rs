//! Generation model selection

use serde::Serialize;

/// Symbols that mark an input as simple regardless of length
const SIMPLE_MARKERS: [char; 3] = ['@', '#', '$'];

/// Model picked for a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "model", rename_all = "lowercase")]
pub enum ModelChoice {
    Light(String),
    Full(String),
}

impl ModelChoice {
    pub fn model(&self) -> &str {
        match self {
            Self::Light(m) | Self::Full(m) => m,
        }
    }

    pub fn into_model(self) -> String {
        match self {
            Self::Light(m) | Self::Full(m) => m,
        }
    }
}

/// Whether `text` is routed to the light model
///
/// Any input with more than one word qualifies, which sends nearly all real
/// traffic to the light model. The threshold is kept as deployed; the
/// intended cut-off was probably much larger.
pub fn is_simple(text: &str) -> bool {
    text.split_whitespace().count() > 1 || text.contains(SIMPLE_MARKERS)
}

/// Pick the generation model for `text`
///
/// Simple inputs always get `light_model`, even when a model was requested.
pub fn select_model(
    text: &str,
    requested: Option<&str>,
    light_model: &str,
    full_model: &str,
) -> ModelChoice {
    if is_simple(text) {
        ModelChoice::Light(light_model.to_string())
    } else {
        ModelChoice::Full(requested.unwrap_or(full_model).to_string())
    }
}
