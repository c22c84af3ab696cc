//! Chroma HTTP API client

use super::{QueryResult, VectorIndex};
use crate::config::Settings;
use crate::error::{ReformError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Collection descriptor as returned by Chroma
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionInfo {
    pub id: String,
    pub name: String,
}

/// Client for a Chroma server (v2 API)
pub struct ChromaClient {
    http_client: reqwest::Client,
    base_url: String,
    tenant: String,
    database: String,
}

impl ChromaClient {
    pub fn new(
        base_url: impl Into<String>,
        tenant: impl Into<String>,
        database: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let http_client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            tenant: tenant.into(),
            database: database.into(),
        })
    }

    /// Create from settings
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Self::new(
            settings.chroma_url(),
            settings.chroma_tenant.clone(),
            settings.chroma_database.clone(),
            Duration::from_secs(settings.backend_timeout_secs),
        )
    }

    fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.base_url, self.tenant, self.database
        )
    }

    /// Look up a collection by name
    pub async fn get_collection(&self, name: &str) -> Result<CollectionInfo> {
        let url = format!("{}/{}", self.collections_url(), name);
        let response = self.http_client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ReformError::CollectionNotFound(name.to_string()));
        }
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(ReformError::ExternalError(format!(
        "Vector index error (HTTP {}): {}",
        status, body
    )))
}

#[async_trait]
impl VectorIndex for ChromaClient {
    async fn query(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<QueryResult> {
        #[derive(Serialize)]
        struct QueryRequest<'a> {
            query_embeddings: [&'a [f32]; 1],
            n_results: usize,
            include: [&'static str; 2],
        }

        let info = self.get_collection(collection).await?;
        let url = format!("{}/{}/query", self.collections_url(), info.id);

        let response = self
            .http_client
            .post(&url)
            .json(&QueryRequest {
                query_embeddings: [embedding],
                n_results: top_k,
                include: ["documents", "distances"],
            })
            .send()
            .await?;

        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn list_collections(&self) -> Result<Vec<String>> {
        let response = self.http_client.get(self.collections_url()).send().await?;
        let response = check_status(response).await?;
        let collections: Vec<CollectionInfo> = response.json().await?;
        Ok(collections.into_iter().map(|c| c.name).collect())
    }
}
