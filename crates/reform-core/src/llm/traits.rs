//! LLM trait definitions

use super::ChatMessage;
use crate::error::Result;
use async_trait::async_trait;
use futures::Stream;
use std::pin::Pin;

/// Incremental content pieces from a streaming chat call
///
/// An `Err` item reports a failure after the connection was established;
/// the stream ends after it.
pub type ContentStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Embedding generation trait
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate embedding for single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Get model name
    fn model_name(&self) -> &str;
}

/// Chat generation backend
#[async_trait]
pub trait LLMClient: Send + Sync {
    /// Single non-streamed chat completion, returning the assistant text
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
    ) -> Result<String>;

    /// Open a streamed chat completion
    ///
    /// Fails only when the request cannot be started; later failures arrive
    /// as `Err` items on the returned stream.
    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
    ) -> Result<ContentStream>;
}
