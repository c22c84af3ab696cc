//! Configuration management
//!
//! Settings are resolved once at startup from an optional YAML file and
//! `REFORM_*` environment variables, then shared read-only by every request.

use crate::error::{ReformError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable pointing at an alternative config file
pub const CONFIG_PATH_ENV: &str = "REFORM_CONFIG";

/// Process-wide service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Vector index (Chroma) host
    pub chroma_host: String,

    /// Vector index (Chroma) port
    pub chroma_port: u16,

    /// Chroma tenant holding the collections
    pub chroma_tenant: String,

    /// Chroma database holding the collections
    pub chroma_database: String,

    /// Prefix of the collection name; the embedding model id is appended
    pub collection_prefix: String,

    /// Base URL of the generation backend (Ollama)
    pub ollama_url: String,

    /// Base URL of the embedding backend (falls back to `ollama_url`)
    pub embedding_url: Option<String>,

    /// Maximum accepted input length in characters
    pub max_input_length: usize,

    /// Passages at or above this distance are dropped from the context
    pub min_context_distance: f64,

    /// Full generation model, used when no override is requested
    pub default_model: String,

    /// Light generation model picked for simple inputs
    pub light_model: String,

    /// Embedding model; also names the collection
    pub default_embedding_model: String,

    /// Capacity of each LRU cache (context and response)
    pub cache_size: usize,

    /// Sampling temperature when the caller does not pass one
    pub temperature: f32,

    /// Number of nearest passages requested from the index
    pub top_k: usize,

    /// Upper bound for a generation call, in seconds
    pub generation_timeout_secs: u64,

    /// Upper bound for embedding and index calls, in seconds
    pub backend_timeout_secs: u64,

    /// Language code used when detection fails
    pub fallback_language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            chroma_host: "127.0.0.1".to_string(),
            chroma_port: 8002,
            chroma_tenant: "default_tenant".to_string(),
            chroma_database: "default_database".to_string(),
            collection_prefix: "rag_documents_".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            embedding_url: None,
            max_input_length: 2000,
            min_context_distance: 0.35,
            default_model: "llama4:latest".to_string(),
            light_model: "mistral-small3.1:24b".to_string(),
            default_embedding_model: "llama2:7b".to_string(),
            cache_size: 100,
            temperature: 0.3,
            top_k: 5,
            generation_timeout_secs: 120,
            backend_timeout_secs: 30,
            fallback_language: "en".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the config file (if any) and the environment
    pub fn load() -> Result<Self> {
        let mut settings = Self::from_file(&Self::config_path())?;
        settings.apply_env()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a YAML file; a missing file yields defaults
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Config file in effect: `REFORM_CONFIG` if set, else the default path
    pub fn config_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(crate::CONFIG_DIR_NAME)
            .join("config.yml")
    }

    /// Override fields from `REFORM_*` environment variables
    pub fn apply_env(&mut self) -> Result<()> {
        override_from_env("REFORM_CHROMA_HOST", &mut self.chroma_host)?;
        override_from_env("REFORM_CHROMA_PORT", &mut self.chroma_port)?;
        override_from_env("REFORM_CHROMA_TENANT", &mut self.chroma_tenant)?;
        override_from_env("REFORM_CHROMA_DATABASE", &mut self.chroma_database)?;
        override_from_env("REFORM_COLLECTION_PREFIX", &mut self.collection_prefix)?;
        override_from_env("REFORM_OLLAMA_URL", &mut self.ollama_url)?;
        if let Ok(url) = std::env::var("REFORM_EMBEDDING_URL") {
            self.embedding_url = Some(url);
        }
        override_from_env("REFORM_MAX_INPUT_LENGTH", &mut self.max_input_length)?;
        override_from_env("REFORM_MIN_CONTEXT_DISTANCE", &mut self.min_context_distance)?;
        override_from_env("REFORM_DEFAULT_MODEL", &mut self.default_model)?;
        override_from_env("REFORM_LIGHT_MODEL", &mut self.light_model)?;
        override_from_env(
            "REFORM_DEFAULT_EMBEDDING_MODEL",
            &mut self.default_embedding_model,
        )?;
        override_from_env("REFORM_CACHE_SIZE", &mut self.cache_size)?;
        override_from_env("REFORM_TEMPERATURE", &mut self.temperature)?;
        override_from_env("REFORM_TOP_K", &mut self.top_k)?;
        override_from_env(
            "REFORM_GENERATION_TIMEOUT_SECS",
            &mut self.generation_timeout_secs,
        )?;
        override_from_env("REFORM_BACKEND_TIMEOUT_SECS", &mut self.backend_timeout_secs)?;
        override_from_env("REFORM_FALLBACK_LANGUAGE", &mut self.fallback_language)?;
        Ok(())
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if !self.min_context_distance.is_finite() {
            return Err(ReformError::Config(
                "min_context_distance must be a finite number".to_string(),
            ));
        }
        if self.top_k == 0 {
            return Err(ReformError::Config("top_k must be at least 1".to_string()));
        }
        if self.generation_timeout_secs == 0 || self.backend_timeout_secs == 0 {
            return Err(ReformError::Config("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Base URL of the vector index service
    pub fn chroma_url(&self) -> String {
        format!("http://{}:{}", self.chroma_host, self.chroma_port)
    }

    /// Get the embeddings URL (falls back to the generation URL)
    pub fn embeddings_url(&self) -> &str {
        self.embedding_url.as_deref().unwrap_or(&self.ollama_url)
    }

    /// Collection holding vectors produced by the configured embedding model
    pub fn collection_name(&self) -> String {
        crate::index::collection_name(&self.collection_prefix, &self.default_embedding_model)
    }
}

fn override_from_env<T>(key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(raw) = std::env::var(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|e| ReformError::Config(format!("{}={:?}: {}", key, raw, e)))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.max_input_length, 2000);
        assert_eq!(settings.min_context_distance, 0.35);
        assert_eq!(settings.cache_size, 100);
        assert_eq!(settings.chroma_url(), "http://127.0.0.1:8002");
        assert_eq!(settings.embeddings_url(), "http://localhost:11434");
        assert_eq!(settings.collection_name(), "rag_documents_llama2-7b");
        settings.validate().unwrap();
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "chroma_port: 9000\nmin_context_distance: 0.5").unwrap();

        let settings = Settings::from_file(file.path()).unwrap();
        assert_eq!(settings.chroma_port, 9000);
        assert_eq!(settings.min_context_distance, 0.5);
        assert_eq!(settings.default_model, "llama4:latest");
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings::from_file(&dir.path().join("nope.yml")).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_embedding_url_override() {
        let settings = Settings {
            embedding_url: Some("http://embed:11434".to_string()),
            ..Settings::default()
        };
        assert_eq!(settings.embeddings_url(), "http://embed:11434");
    }

    #[test]
    fn test_validate_rejects_zero_top_k() {
        let settings = Settings {
            top_k: 0,
            ..Settings::default()
        };
        assert!(matches!(settings.validate(), Err(ReformError::Config(_))));
    }
}
