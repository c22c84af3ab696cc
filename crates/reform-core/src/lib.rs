//! Reform Core Library
//!
//! Retrieval-augmented rewriting of free-text renovation descriptions.
//!
//! # Features
//! - Input validation and HTML escaping
//! - Language detection with a configurable fallback
//! - Context retrieval from a Chroma vector index, distance-filtered
//! - Prompt composition with domain instructions
//! - Blocking or streamed generation through Ollama
//! - Bounded LRU caches for contexts and replies

pub mod cache;
pub mod config;
pub mod error;
pub mod index;
pub mod language;
pub mod llm;
pub mod pipeline;
pub mod validate;

pub use cache::{BoundedCache, CacheStats};
pub use config::Settings;
pub use error::{Error, ReformError, Result};
pub use index::{collection_name, ChromaClient, CollectionInfo, QueryResult, VectorIndex};
pub use language::{detect, detect_language, Detection};
pub use llm::{
    ChatMessage, ContentStream, Embedder, GenerationOptions, HttpEmbedder, LLMClient,
    OllamaClient,
};
pub use pipeline::{
    ContextRetriever, FragmentStream, ModelChoice, Pipeline, PipelineOutput, PromptMessages,
    ResponseGenerator, Retrieval, RunOptions,
};
pub use validate::{escape_html, validate, ValidatedInput};

/// Default config directory name
pub const CONFIG_DIR_NAME: &str = "reform";
