//! Error types for reform

use thiserror::Error;

/// Result type alias using ReformError
pub type Result<T> = std::result::Result<T, ReformError>;

/// Error type alias for convenience
pub type Error = ReformError;

/// Exit codes for CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const BACKEND_UNAVAILABLE: i32 = 2;
    pub const INVALID_INPUT: i32 = 3;
}

/// Main error type for reform
#[derive(Debug, Error)]
pub enum ReformError {
    #[error("Input too short (minimum {min} characters)")]
    InvalidInput { min: usize },

    #[error("Input exceeds {max} characters")]
    InputTooLong { max: usize },

    #[error("Language detection failed: {0}")]
    Detection(String),

    #[error("Context retrieval failed: {0}")]
    Retrieval(String),

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("External service error: {0}")]
    ExternalError(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl ReformError {
    /// True for errors raised by input validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::InputTooLong { .. })
    }

    /// Message shown to end users, prefixed by error class
    pub fn user_message(&self) -> String {
        if self.is_validation() {
            format!("Validation error: {}", self)
        } else {
            format!("Error: {}", self)
        }
    }

    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } | Self::InputTooLong { .. } | Self::Config(_) => {
                exit_codes::INVALID_INPUT
            }
            Self::Http(_) | Self::ExternalError(_) | Self::CollectionNotFound(_) => {
                exit_codes::BACKEND_UNAVAILABLE
            }
            _ => exit_codes::GENERAL_ERROR,
        }
    }
}
