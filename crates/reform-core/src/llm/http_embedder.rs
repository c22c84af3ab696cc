//! HTTP-based embedder using the Ollama embed API

use super::Embedder;
use crate::config::Settings;
use crate::error::{ReformError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Embedder backed by an Ollama `/api/embed` endpoint
pub struct HttpEmbedder {
    http_client: reqwest::Client,
    base_url: String,
    model: String,
}

impl HttpEmbedder {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    /// Create from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.embeddings_url(),
            settings.default_embedding_model.clone(),
            Duration::from_secs(settings.backend_timeout_secs),
        )
    }
}

#[async_trait]
impl Embedder for HttpEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        #[derive(Serialize)]
        struct EmbedRequest<'a> {
            model: &'a str,
            input: &'a str,
        }

        #[derive(Deserialize)]
        struct EmbedResponse {
            embeddings: Vec<Vec<f32>>,
        }

        let start = Instant::now();
        let url = format!("{}/api/embed", self.base_url);
        let response = self
            .http_client
            .post(&url)
            .json(&EmbedRequest {
                model: &self.model,
                input: text,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ReformError::ExternalError(format!(
                "Embedding service error (HTTP {}): {}",
                status, body
            )));
        }

        let embed_response: EmbedResponse = response.json().await?;
        let embedding = embed_response
            .embeddings
            .into_iter()
            .next()
            .ok_or_else(|| ReformError::ExternalError("No embedding returned".to_string()))?;

        tracing::info!(
            "Embedding generated in {:.2}s",
            start.elapsed().as_secs_f64()
        );
        Ok(embedding)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
