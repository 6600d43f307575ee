//! Memory Provider capability
//!
//! Retrieval-only client for the externally maintained vector index. The
//! engine treats retrieval as advisory: a failed or empty lookup degrades to
//! empty context rather than failing the run.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// One retrieved snippet, ordered by relevance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snippet {
    pub text: String,
    #[serde(default)]
    pub metadata: Value,
}

impl Snippet {
    #[allow(dead_code)] // Useful for tests
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            metadata: Value::Null,
        }
    }
}

#[derive(Debug, Error)]
pub enum MemoryError {
    #[error("memory provider unreachable: {0}")]
    Unreachable(String),
    #[error("memory provider returned an error: {0}")]
    Provider(String),
}

/// Narrow retrieval interface over the vector index
#[async_trait]
pub trait MemoryProvider: Send + Sync {
    /// Student-scoped similarity search over personal interaction history
    async fn retrieve_context(
        &self,
        student_did: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<Snippet>, MemoryError>;

    /// Un-scoped similarity search over curated pedagogical material
    async fn retrieve_worldview_context(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Snippet>, MemoryError>;
}

// ============================================================================
// No-op provider
// ============================================================================

/// Provider used when no memory service is configured; always returns
/// empty lists, which collation renders as empty context.
pub struct NoopMemoryProvider;

#[async_trait]
impl MemoryProvider for NoopMemoryProvider {
    async fn retrieve_context(
        &self,
        _student_did: &str,
        _query: &str,
        _k: usize,
    ) -> Result<Vec<Snippet>, MemoryError> {
        Ok(Vec::new())
    }

    async fn retrieve_worldview_context(
        &self,
        _query: &str,
        _k: usize,
    ) -> Result<Vec<Snippet>, MemoryError> {
        Ok(Vec::new())
    }
}

// ============================================================================
// HTTP provider
// ============================================================================

/// Client for the vector-search service's `/search` endpoint
pub struct HttpMemoryProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMemoryProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    async fn search(
        &self,
        query: &str,
        k: usize,
        filter: Value,
    ) -> Result<Vec<Snippet>, MemoryError> {
        let url = format!("{}/search", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&json!({ "query": query, "k": k, "filter": filter }))
            .send()
            .await
            .map_err(|e| MemoryError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MemoryError::Provider(format!("HTTP {status}: {body}")));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| MemoryError::Provider(format!("malformed response: {e}")))?;
        Ok(parsed.results)
    }
}

fn personal_filter(student_did: &str) -> Value {
    json!({ "student_did": student_did })
}

fn worldview_filter() -> Value {
    json!({ "doc_type": "worldview" })
}

#[async_trait]
impl MemoryProvider for HttpMemoryProvider {
    async fn retrieve_context(
        &self,
        student_did: &str,
        query: &str,
        k: usize,
    ) -> Result<Vec<Snippet>, MemoryError> {
        self.search(query, k, personal_filter(student_did)).await
    }

    async fn retrieve_worldview_context(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Snippet>, MemoryError> {
        self.search(query, k, worldview_filter()).await
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: Vec<Snippet>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn noop_provider_returns_empty_lists() {
        let provider = NoopMemoryProvider;
        let personal = provider.retrieve_context("did:1", "algebra", 5).await.unwrap();
        let worldview = provider.retrieve_worldview_context("algebra", 3).await.unwrap();
        assert!(personal.is_empty());
        assert!(worldview.is_empty());
    }

    #[test]
    fn personal_filter_scopes_by_student() {
        let filter = personal_filter("did:student:42");
        assert_eq!(filter["student_did"], "did:student:42");
    }

    #[test]
    fn worldview_filter_scopes_by_doc_type() {
        assert_eq!(worldview_filter()["doc_type"], "worldview");
    }

    #[test]
    fn snippet_metadata_defaults_to_null() {
        let snippet: Snippet = serde_json::from_str(r#"{"text": "hello"}"#).unwrap();
        assert_eq!(snippet.metadata, Value::Null);
    }
}
