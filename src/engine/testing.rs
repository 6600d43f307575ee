//! Mock capabilities for engine tests
//!
//! These doubles stand in for the model, memory, and tool collaborators so
//! the orchestration cycle can be exercised without real I/O.

use crate::llm::{ModelClient, ModelError, ModelReply, ModelRequest};
use crate::memory::{MemoryError, MemoryProvider, Snippet};
use crate::tools::{Tool, ToolOutput};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

// ============================================================================
// Mock Model Client
// ============================================================================

/// Model client that returns queued replies in order
pub struct MockModelClient {
    replies: Mutex<VecDeque<Result<ModelReply, ModelError>>>,
    model_id: String,
    /// Record of all requests made
    pub requests: Mutex<Vec<ModelRequest>>,
}

impl MockModelClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, reply: ModelReply) {
        self.replies.lock().unwrap().push_back(Ok(reply));
    }

    /// Queue an error reply
    pub fn queue_error(&self, error: ModelError) {
        self.replies.lock().unwrap().push_back(Err(error));
    }

    /// Get recorded requests
    pub fn recorded_requests(&self) -> Vec<ModelRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn invoke(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::network("No mock reply queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Delayed Mock Model Client (for cancellation testing)
// ============================================================================

/// Model client with configurable delay before answering
pub struct DelayedModelClient {
    inner: MockModelClient,
    delay: Duration,
    /// Notified when a request starts (for test synchronization)
    pub request_started: Arc<Notify>,
}

impl DelayedModelClient {
    pub fn new(model_id: impl Into<String>, delay: Duration) -> Self {
        Self {
            inner: MockModelClient::new(model_id),
            delay,
            request_started: Arc::new(Notify::new()),
        }
    }

    pub fn queue_reply(&self, reply: ModelReply) {
        self.inner.queue_reply(reply);
    }
}

#[async_trait]
impl ModelClient for DelayedModelClient {
    async fn invoke(&self, request: &ModelRequest) -> Result<ModelReply, ModelError> {
        // notify_one stores a permit, so the waiter wins even if it
        // subscribes after the request has already started.
        self.request_started.notify_one();
        tokio::time::sleep(self.delay).await;
        self.inner.invoke(request).await
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

// ============================================================================
// Scripted Memory Provider
// ============================================================================

/// Memory provider returning fixed snippets, or failing on demand
pub struct ScriptedMemoryProvider {
    personal: Vec<Snippet>,
    worldview: Vec<Snippet>,
    fail: bool,
}

impl ScriptedMemoryProvider {
    /// Provider with no stored snippets
    pub fn empty() -> Self {
        Self {
            personal: Vec::new(),
            worldview: Vec::new(),
            fail: false,
        }
    }

    pub fn with_snippets(personal: Vec<&str>, worldview: Vec<&str>) -> Self {
        Self {
            personal: personal.into_iter().map(Snippet::new).collect(),
            worldview: worldview.into_iter().map(Snippet::new).collect(),
            fail: false,
        }
    }

    /// Provider whose every retrieval fails
    pub fn failing() -> Self {
        Self {
            personal: Vec::new(),
            worldview: Vec::new(),
            fail: true,
        }
    }

    fn take(&self, snippets: &[Snippet], k: usize) -> Result<Vec<Snippet>, MemoryError> {
        if self.fail {
            return Err(MemoryError::Unreachable("scripted failure".to_string()));
        }
        Ok(snippets.iter().take(k).cloned().collect())
    }
}

#[async_trait]
impl MemoryProvider for ScriptedMemoryProvider {
    async fn retrieve_context(
        &self,
        _student_did: &str,
        _query: &str,
        k: usize,
    ) -> Result<Vec<Snippet>, MemoryError> {
        self.take(&self.personal, k)
    }

    async fn retrieve_worldview_context(
        &self,
        _query: &str,
        k: usize,
    ) -> Result<Vec<Snippet>, MemoryError> {
        self.take(&self.worldview, k)
    }
}

// ============================================================================
// Static Tool
// ============================================================================

/// Tool that always returns the same canned output
pub struct StaticTool {
    name: String,
    output: ToolOutput,
}

impl StaticTool {
    pub fn new(name: impl Into<String>, output: ToolOutput) -> Self {
        Self {
            name: name.into(),
            output,
        }
    }
}

#[async_trait]
impl Tool for StaticTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!("Static {}", self.name)
    }

    fn input_schema(&self) -> Value {
        json!({ "type": "object", "properties": {} })
    }

    async fn run(&self, _input: Value) -> ToolOutput {
        self.output.clone()
    }
}
