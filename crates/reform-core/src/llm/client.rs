//! HTTP client for the Ollama chat API

use super::stream::content_stream;
use super::{ContentStream, LLMClient};
use crate::config::Settings;
use crate::error::{ReformError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Chat message for completion requests
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Runtime options forwarded to the backend with every chat request
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOptions {
    pub num_gpu: u32,
    pub num_thread: u32,
    pub quantization: String,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            num_gpu: 1,
            num_thread: 8,
            quantization: "q4_0".to_string(),
        }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    stream: bool,
    options: RequestOptions<'a>,
}

#[derive(Serialize)]
struct RequestOptions<'a> {
    #[serde(flatten)]
    runtime: &'a GenerationOptions,
    temperature: f32,
}

#[derive(Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

/// Ollama chat client
pub struct OllamaClient {
    http_client: reqwest::Client,
    stream_client: reqwest::Client,
    base_url: String,
    timeout: Duration,
    options: GenerationOptions,
}

impl OllamaClient {
    /// Create a client for `base_url`; `timeout` bounds a blocking call and
    /// each read of a streamed one
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        // Streams are bounded per read, not overall
        let stream_client = reqwest::Client::builder().connect_timeout(timeout).build()?;

        Ok(Self {
            http_client,
            stream_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
            options: GenerationOptions::default(),
        })
    }

    /// Create from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.ollama_url.clone(),
            Duration::from_secs(settings.generation_timeout_secs),
        )
    }

    pub fn with_options(mut self, options: GenerationOptions) -> Self {
        self.options = options;
        self
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.base_url)
    }

    fn request<'a>(
        &'a self,
        messages: &'a [ChatMessage],
        model: &'a str,
        temperature: f32,
        stream: bool,
    ) -> ChatRequest<'a> {
        ChatRequest {
            model,
            messages,
            temperature,
            stream,
            options: RequestOptions {
                runtime: &self.options,
                temperature,
            },
        }
    }
}

#[async_trait]
impl LLMClient for OllamaClient {
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
    ) -> Result<String> {
        let start = Instant::now();
        let request = self.request(messages, model, temperature, false);

        let response = self
            .http_client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReformError::ExternalError(format!(
                "LLM service error (HTTP {}): {}",
                status, body
            )));
        }

        let chat_response: ChatResponse = response.json().await?;

        tracing::info!(
            "Ollama response received in {:.2}s",
            start.elapsed().as_secs_f64()
        );
        Ok(chat_response.message.content)
    }

    async fn chat_stream(
        &self,
        messages: &[ChatMessage],
        model: &str,
        temperature: f32,
    ) -> Result<ContentStream> {
        let request = self.request(messages, model, temperature, true);

        let response = self
            .stream_client
            .post(self.chat_url())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReformError::ExternalError(format!(
                "LLM service error (HTTP {}): {}",
                status, body
            )));
        }

        Ok(content_stream(response.bytes_stream(), self.timeout))
    }
}
