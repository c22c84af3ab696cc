//! Retrieval-and-generation pipeline
//!
//! Stages, in order:
//! - Input validation
//! - Language detection
//! - Context retrieval (cached)
//! - Model selection
//! - Prompt composition
//! - Generation, blocking (cached, post-processed) or streamed

mod generator;
mod model;
mod postprocess;
mod prompt;
mod retriever;

pub use generator::{FragmentStream, ResponseGenerator};
pub use model::{is_simple, select_model, ModelChoice};
pub use postprocess::{postprocess, MAX_RESPONSE_CHARS};
pub use prompt::{compose, normalize_language, PromptMessages, MAX_CONTEXT_CHARS};
pub use retriever::{filter_passages, ContextRetriever, Retrieval};

use crate::cache::CacheStats;
use crate::config::Settings;
use crate::error::Result;
use crate::index::{ChromaClient, VectorIndex};
use crate::language;
use crate::llm::{Embedder, HttpEmbedder, LLMClient, OllamaClient};
use crate::validate::validate;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Per-request overrides
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stream the reply instead of returning it whole
    pub streaming: bool,
    /// Requested model; ignored when the input routes to the light model
    pub model: Option<String>,
    /// Sampling temperature; the configured default when unset
    pub temperature: Option<f32>,
}

impl RunOptions {
    pub fn blocking() -> Self {
        Self::default()
    }

    pub fn streaming() -> Self {
        Self {
            streaming: true,
            ..Self::default()
        }
    }
}

/// Displayable pipeline result
pub enum PipelineOutput {
    /// Finished text: post-processed reply or a descriptive error
    Text(String),
    /// Lazy fragments of a streamed reply, unprocessed
    Stream(FragmentStream),
}

impl PipelineOutput {
    pub fn is_stream(&self) -> bool {
        matches!(self, Self::Stream(_))
    }

    /// Text of a finished result; `None` for streams
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Stream(_) => None,
        }
    }
}

impl fmt::Debug for PipelineOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// Request-independent pipeline state, shared by all requests
pub struct Pipeline {
    settings: Arc<Settings>,
    retriever: ContextRetriever,
    generator: ResponseGenerator,
}

impl Pipeline {
    /// Assemble a pipeline from explicit backends
    pub fn new(
        settings: Arc<Settings>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        client: Arc<dyn LLMClient>,
    ) -> Self {
        let retriever = ContextRetriever::new(
            embedder,
            index,
            settings.collection_name(),
            settings.min_context_distance,
            settings.cache_size,
        );
        let generator = ResponseGenerator::new(client, settings.cache_size);
        Self {
            settings,
            retriever,
            generator,
        }
    }

    /// Assemble a pipeline talking to the configured HTTP backends
    pub fn from_settings(settings: Arc<Settings>) -> Result<Self> {
        let embedder = Arc::new(HttpEmbedder::from_settings(&settings)?);
        let index = Arc::new(ChromaClient::from_settings(&settings)?);
        let client = Arc::new(OllamaClient::from_settings(&settings)?);
        Ok(Self::new(settings, embedder, index, client))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Context and response cache statistics
    pub fn cache_stats(&self) -> (CacheStats, CacheStats) {
        (self.retriever.cache_stats(), self.generator.cache_stats())
    }

    /// Run the pipeline; failures come back as descriptive text
    pub async fn run(&self, user_text: &str, options: RunOptions) -> PipelineOutput {
        match self.try_run(user_text, options).await {
            Ok(output) => output,
            Err(e) => PipelineOutput::Text(e.user_message()),
        }
    }

    /// Run the pipeline, propagating validation and generation errors
    pub async fn try_run(&self, user_text: &str, options: RunOptions) -> Result<PipelineOutput> {
        let settings = &self.settings;
        let input = validate(user_text, settings.max_input_length)?;

        let lang = language::detect(&input, &settings.fallback_language);

        let start = Instant::now();
        let retrieval = self.retriever.retrieve_detailed(&input, settings.top_k).await;
        tracing::info!(
            "Context stage finished in {:.2}s ({})",
            start.elapsed().as_secs_f64(),
            retrieval_label(&retrieval)
        );
        let context = retrieval.into_context();

        let choice = select_model(
            &input,
            options.model.as_deref(),
            &settings.light_model,
            &settings.default_model,
        );
        tracing::debug!("Model selected: {:?}", choice);

        let messages = compose(&lang, &context, &input);
        let temperature = options.temperature.unwrap_or(settings.temperature);

        if options.streaming {
            let stream =
                self.generator
                    .generate_stream(messages, choice.into_model(), temperature);
            return Ok(PipelineOutput::Stream(stream));
        }

        let reply = self
            .generator
            .generate(&messages, choice.model(), temperature)
            .await?;
        Ok(PipelineOutput::Text(postprocess(&reply)))
    }
}

fn retrieval_label(retrieval: &Retrieval) -> &'static str {
    match retrieval {
        Retrieval::Cached(_) => "cached",
        Retrieval::Found { .. } => "found",
        Retrieval::Empty { .. } => "no relevant passages",
        Retrieval::Failed(_) => "lookup failed",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_options_presets() {
        assert!(!RunOptions::blocking().streaming);
        assert!(RunOptions::streaming().streaming);
        assert!(RunOptions::streaming().model.is_none());
    }

    #[test]
    fn test_output_accessors() {
        let text = PipelineOutput::Text("done".into());
        assert_eq!(text.text(), Some("done"));
        assert!(!text.is_stream());

        let stream = PipelineOutput::Stream(Box::pin(futures::stream::empty()));
        assert!(stream.is_stream());
        assert_eq!(stream.text(), None);
        assert_eq!(format!("{:?}", stream), "Stream(..)");
    }
}
