//! Blocking and streamed response generation

use super::PromptMessages;
use crate::cache::{BoundedCache, CacheStats};
use crate::error::{ReformError, Result};
use crate::llm::LLMClient;
use futures::{Stream, StreamExt};
use std::pin::Pin;
use std::sync::Arc;

/// Text fragments of a streamed response, in backend order
pub type FragmentStream = Pin<Box<dyn Stream<Item = String> + Send>>;

/// Exact-match key for blocking responses
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResponseKey {
    messages: PromptMessages,
    model: String,
    temperature_bits: u32,
}

impl ResponseKey {
    fn new(messages: &PromptMessages, model: &str, temperature: f32) -> Self {
        Self {
            messages: messages.clone(),
            model: model.to_string(),
            temperature_bits: temperature.to_bits(),
        }
    }
}

/// Calls the generation backend, caching blocking replies
pub struct ResponseGenerator {
    client: Arc<dyn LLMClient>,
    cache: BoundedCache<ResponseKey, String>,
}

impl ResponseGenerator {
    pub fn new(client: Arc<dyn LLMClient>, cache_size: usize) -> Self {
        Self {
            client,
            cache: BoundedCache::new(cache_size),
        }
    }

    /// Single reply for the prompt, served from cache on an exact match
    pub async fn generate(
        &self,
        messages: &PromptMessages,
        model: &str,
        temperature: f32,
    ) -> Result<String> {
        let key = ResponseKey::new(messages, model, temperature);
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("Response cache hit for model {}", model);
            return Ok(cached);
        }

        let text = self
            .client
            .chat_completion(messages, model, temperature)
            .await
            .map_err(|e| {
                tracing::error!("Ollama API call failed: {}", e);
                match e {
                    ReformError::Generation(_) => e,
                    other => ReformError::Generation(other.to_string()),
                }
            })?;

        self.cache.insert(key, text.clone());
        Ok(text)
    }

    /// Lazily streamed reply; never cached
    ///
    /// The backend is contacted on the first poll. A failure to connect, or
    /// any later transport failure, becomes one final `Error: ...` fragment.
    pub fn generate_stream(
        &self,
        messages: PromptMessages,
        model: String,
        temperature: f32,
    ) -> FragmentStream {
        let client = Arc::clone(&self.client);

        let opened = async move { client.chat_stream(&messages, &model, temperature).await };

        futures::stream::once(opened)
            .flat_map(|opened| match opened {
                Ok(contents) => contents,
                Err(e) => futures::stream::once(async move { Err(e) }).boxed(),
            })
            .scan(false, |failed, item| {
                let fragment = if *failed {
                    None
                } else {
                    match item {
                        Ok(text) => Some(text),
                        Err(e) => {
                            tracing::error!("Streaming error: {}", e);
                            *failed = true;
                            Some(format!("Error: {}", e))
                        }
                    }
                };
                futures::future::ready(fragment)
            })
            .boxed()
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
