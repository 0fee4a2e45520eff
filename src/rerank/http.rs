//! Cross-encoder reranking over an HTTP rerank API.
//!
//! Speaks the request/response shape shared by the Jina and Cohere rerank
//! endpoints: post the query with the candidate documents, get back indices
//! with relevance scores.

use super::{RankedPassage, Reranker};
use crate::error::{Result, SvarError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument};

/// Environment variable holding the rerank API key.
const API_KEY_ENV: &str = "RERANK_API_KEY";

/// Timeout for rerank API requests.
const TIMEOUT_SECS: u64 = 60;

/// HTTP cross-encoder reranker.
pub struct HttpReranker {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct RerankRequest<'a> {
    model: &'a str,
    query: &'a str,
    documents: &'a [String],
    top_n: usize,
}

#[derive(Deserialize)]
struct RerankResponse {
    results: Vec<RerankResult>,
}

#[derive(Deserialize)]
struct RerankResult {
    index: usize,
    relevance_score: f32,
}

impl HttpReranker {
    /// Create a reranker against the given endpoint and model.
    ///
    /// The API key is read from `RERANK_API_KEY` if not supplied.
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            endpoint: endpoint.to_string(),
            model: model.to_string(),
            api_key: std::env::var(API_KEY_ENV).ok().filter(|k| !k.is_empty()),
        }
    }

    /// Override the API key.
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }
}

#[async_trait]
impl Reranker for HttpReranker {
    #[instrument(skip(self, query, candidates), fields(count = candidates.len()))]
    async fn rerank(
        &self,
        query: &str,
        candidates: &[String],
        top_n: usize,
    ) -> Result<Vec<RankedPassage>> {
        if candidates.is_empty() || top_n == 0 {
            return Ok(Vec::new());
        }

        let body = RerankRequest {
            model: &self.model,
            query,
            documents: candidates,
            top_n,
        };

        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            let detail: String = detail.chars().take(200).collect();
            return Err(SvarError::Rerank(format!(
                "Rerank API returned {}: {}",
                status, detail
            )));
        }

        let parsed: RerankResponse = response.json().await?;

        let mut passages = Vec::with_capacity(parsed.results.len().min(top_n));
        for result in parsed.results.into_iter().take(top_n) {
            let text = candidates.get(result.index).ok_or_else(|| {
                SvarError::Rerank(format!(
                    "Rerank API returned out-of-range index {}",
                    result.index
                ))
            })?;
            passages.push(RankedPassage {
                index: result.index,
                text: text.clone(),
                score: result.relevance_score,
            });
        }

        debug!("Reranked {} candidates to {}", candidates.len(), passages.len());
        Ok(passages)
    }
}
