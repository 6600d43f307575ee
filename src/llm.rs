//! Model capability abstraction
//!
//! Provides a common interface for the language-generation collaborator.
//! The engine treats generation as an opaque capability: one request in,
//! one reply out, no retries.

mod error;
mod openai;
mod types;

pub use error::{ModelError, ModelErrorKind};
pub use openai::{OpenAiClient, DEFAULT_MODEL};
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for model providers
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Make a completion request
    async fn invoke(&self, request: &ModelRequest) -> Result<ModelReply, ModelError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for model clients
pub struct LoggingClient {
    inner: Arc<dyn ModelClient>,
    model_id: String,
}

impl LoggingClient {
    pub fn new(inner: Arc<dyn ModelClient>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl ModelClient for LoggingClient {
    async fn invoke(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        let start = std::time::Instant::now();
        let result = self.inner.invoke(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(reply) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    tool_calls = reply.tool_calls.len(),
                    "model request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    retryable = e.kind.is_retryable(),
                    "model request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
