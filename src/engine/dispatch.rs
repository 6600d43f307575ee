//! Tool dispatch
//!
//! Fans out every tool call from one generated message concurrently and
//! joins on all of them before returning. This is the only point of
//! intra-run parallelism. No call is abandoned: unknown names and failed
//! executions come back as error-content results correlated by call id.

use crate::llm::{Message, ToolCallRequest};
use crate::tools::ToolRegistry;
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Concurrent tool executions per dispatch batch
pub const DEFAULT_TOOL_CONCURRENCY: usize = 8;

pub struct ToolDispatcher {
    registry: Arc<ToolRegistry>,
    concurrency: usize,
}

impl ToolDispatcher {
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self::with_concurrency(registry, DEFAULT_TOOL_CONCURRENCY)
    }

    pub fn with_concurrency(registry: Arc<ToolRegistry>, concurrency: usize) -> Self {
        Self {
            registry,
            concurrency: concurrency.max(1),
        }
    }

    /// Execute all calls and wait for every result (a join, not a race).
    /// Results arrive in completion order; correlation is by call id.
    pub async fn dispatch(&self, calls: &[ToolCallRequest]) -> Vec<Message> {
        stream::iter(calls.iter().cloned().map(|call| self.run_one(call)))
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }

    async fn run_one(&self, call: ToolCallRequest) -> Message {
        match self.registry.execute(&call.name, call.arguments.clone()).await {
            Some(output) if output.success => Message::tool_result(&call.id, output.output),
            Some(output) => {
                tracing::warn!(tool = %call.name, call_id = %call.id, "tool reported failure");
                Message::tool_result(&call.id, format!("ERROR: {}", output.output))
            }
            None => {
                tracing::warn!(tool = %call.name, call_id = %call.id, "unknown tool requested");
                Message::tool_result(&call.id, format!("ERROR: unknown tool '{}'", call.name))
            }
        }
    }
}
