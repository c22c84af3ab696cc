//! Request and response bodies

use reform_core::RunOptions;
use serde::{Deserialize, Serialize};

/// Body of `POST /api/reform-description`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReformRequest {
    pub prompt: Option<String>,
    #[serde(default)]
    pub use_streaming: bool,
    pub model: Option<String>,
    pub temperature: Option<f32>,
}

impl ReformRequest {
    /// Prompt text, if the field was sent
    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn run_options(&self) -> RunOptions {
        RunOptions {
            streaming: self.use_streaming,
            model: self.model.clone(),
            temperature: self.temperature,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContentBody<'a> {
    pub content: &'a str,
}

#[derive(Debug, Serialize)]
pub struct DoneBody {
    pub done: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

/// One `data: <json>` event followed by a blank line
pub fn event<T: Serialize>(payload: &T) -> String {
    match serde_json::to_string(payload) {
        Ok(json) => format!("data: {}\n\n", json),
        Err(e) => {
            tracing::error!("Failed to encode event: {}", e);
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_fields_missing() {
        let req: ReformRequest = serde_json::from_str(r#"{"prompt": "paint walls"}"#).unwrap();
        assert_eq!(req.prompt(), Some("paint walls"));
        assert!(!req.use_streaming);
        assert!(req.run_options().model.is_none());
    }

    #[test]
    fn test_empty_prompt_is_present() {
        let req: ReformRequest = serde_json::from_str(r#"{"prompt": ""}"#).unwrap();
        assert_eq!(req.prompt(), Some(""));

        let req: ReformRequest = serde_json::from_str(r#"{"use_streaming": true}"#).unwrap();
        assert_eq!(req.prompt(), None);
    }

    #[test]
    fn test_event_framing() {
        assert_eq!(
            event(&ContentBody { content: "Wand \"neu\"" }),
            "data: {\"content\":\"Wand \\\"neu\\\"\"}\n\n"
        );
        assert_eq!(event(&DoneBody { done: true }), "data: {\"done\":true}\n\n");
    }
}
