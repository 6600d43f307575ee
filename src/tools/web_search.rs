//! Web search tool
//!
//! Thin client over a Tavily-style search API. Search failures stay inside
//! the tool boundary as error outputs.

use super::{Tool, ToolOutput};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

/// Results requested per search
pub const MAX_RESULTS: usize = 3;

const DEFAULT_BASE_URL: &str = "https://api.tavily.com/search";

/// Search backend configuration
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub api_key: String,
    pub base_url: String,
}

impl SearchConfig {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

pub struct WebSearchTool {
    client: Client,
    config: SearchConfig,
}

#[derive(Debug, Deserialize)]
struct SearchInput {
    query: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
struct SearchResult {
    title: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    url: String,
}

impl WebSearchTool {
    pub fn new(config: SearchConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .expect("Failed to create HTTP client");
        Self { client, config }
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchResult>, String> {
        let response = self
            .client
            .post(&self.config.base_url)
            .json(&json!({
                "api_key": self.config.api_key,
                "query": query,
                "max_results": MAX_RESULTS,
            }))
            .send()
            .await
            .map_err(|e| format!("search request failed: {e}"))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("search backend returned HTTP {status}"));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| format!("malformed search response: {e}"))?;
        Ok(parsed.results)
    }
}

fn format_results(results: &[SearchResult]) -> String {
    if results.is_empty() {
        return "No results found.".to_string();
    }
    results
        .iter()
        .map(|r| format!("{}: {} ({})", r.title, r.content, r.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> String {
        "Searches the web for up-to-date information relevant to the student's question."
            .to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                }
            }
        })
    }

    async fn run(&self, input: Value) -> ToolOutput {
        let parsed: SearchInput = match serde_json::from_value(input) {
            Ok(p) => p,
            Err(e) => return ToolOutput::error(format!("Invalid input: {e}")),
        };

        match self.search(&parsed.query).await {
            Ok(results) => ToolOutput::success(format_results(&results)),
            Err(e) => {
                tracing::warn!(error = %e, "web search failed");
                ToolOutput::error(format!("Search failed: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn search_rejects_missing_query() {
        let tool = WebSearchTool::new(SearchConfig::new("key".to_string()));
        let result = tool.run(json!({})).await;
        assert!(!result.success);
        assert!(result.output.contains("Invalid input"));
    }

    #[test]
    fn formatted_results_carry_titles_and_urls() {
        let results = vec![SearchResult {
            title: "Fractions".to_string(),
            content: "A fraction represents part of a whole.".to_string(),
            url: "https://example.org/fractions".to_string(),
        }];
        let text = format_results(&results);
        assert!(text.contains("Fractions"));
        assert!(text.contains("https://example.org/fractions"));
    }

    #[test]
    fn empty_results_render_a_placeholder() {
        assert_eq!(format_results(&[]), "No results found.");
    }
}
