//! Orchestration state machine
//!
//! Drives one run through Collating → Invoking → Routing →
//! {Dispatching → Invoking | Done} as an explicit bounded loop rather
//! than open-ended continuation chaining. The pass counter caps the
//! Generate↔Dispatch cycle; a model that keeps requesting tools
//! terminates with `LoopBoundExceeded` instead of looping forever.

use super::collate::ContextCollator;
use super::dispatch::ToolDispatcher;
use super::error::EngineError;
use super::generate::ResponseGenerator;
use super::route::{route, Decision};
use super::state::ConversationState;
use crate::llm::{Message, ModelClient, ToolCallRequest, ToolSpec};
use crate::memory::MemoryProvider;
use crate::tools::ToolRegistry;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Hard cap on generate passes per run
pub const MAX_GENERATE_PASSES: u32 = 6;

/// Phases of one orchestration run
#[derive(Debug)]
enum Phase {
    Collating,
    Invoking,
    Routing,
    Dispatching(Vec<ToolCallRequest>),
    Done,
}

pub struct Orchestrator {
    collator: ContextCollator,
    generator: ResponseGenerator,
    dispatcher: ToolDispatcher,
    tool_specs: Vec<ToolSpec>,
}

impl Orchestrator {
    pub fn new(
        memory: Arc<dyn MemoryProvider>,
        model: Arc<dyn ModelClient>,
        registry: Arc<ToolRegistry>,
    ) -> Self {
        let tool_specs = registry.definitions();
        Self {
            collator: ContextCollator::new(memory),
            generator: ResponseGenerator::new(model),
            dispatcher: ToolDispatcher::new(registry),
            tool_specs,
        }
    }

    /// Run the cycle to completion and return the terminal message content.
    ///
    /// The caller owns the conversation state; on failure the transcript
    /// keeps everything appended so far, which is the diagnostic record for
    /// cancelled or over-budget runs.
    pub async fn run(
        &self,
        state: &mut ConversationState,
        cancel: &CancellationToken,
    ) -> Result<String, EngineError> {
        tracing::info!(student_did = %state.student_did, mode = %state.mode, "starting run");

        let mut phase = Phase::Collating;
        let mut passes: u32 = 0;

        loop {
            phase = match phase {
                Phase::Collating => {
                    let query = state.last_human_text().unwrap_or_default().to_string();
                    let context = guarded(
                        cancel,
                        self.collator.collate(&state.student_did, &query),
                    )
                    .await?;
                    state.set_context(context);
                    Phase::Invoking
                }

                Phase::Invoking => {
                    passes += 1;
                    if passes > MAX_GENERATE_PASSES {
                        tracing::warn!(
                            student_did = %state.student_did,
                            limit = MAX_GENERATE_PASSES,
                            "generate loop hit the pass limit"
                        );
                        return Err(EngineError::LoopBoundExceeded {
                            limit: MAX_GENERATE_PASSES,
                        });
                    }
                    let message = guarded(
                        cancel,
                        self.generator.generate(
                            state.mode,
                            &state.context,
                            state.messages(),
                            &self.tool_specs,
                        ),
                    )
                    .await??;
                    state.push(message);
                    Phase::Routing
                }

                Phase::Routing => match state.last_message() {
                    Some(last) if route(last) == Decision::Continue => {
                        let calls = pending_tool_calls(last);
                        Phase::Dispatching(calls)
                    }
                    _ => Phase::Done,
                },

                Phase::Dispatching(calls) => {
                    tracing::debug!(count = calls.len(), pass = passes, "dispatching tool calls");
                    let results = guarded(cancel, self.dispatcher.dispatch(&calls)).await?;
                    // The whole batch lands before the next generate pass.
                    for result in results {
                        state.push(result);
                    }
                    Phase::Invoking
                }

                Phase::Done => {
                    let content = match state.last_message() {
                        Some(Message::Generated { content, .. }) => content.clone(),
                        _ => String::new(),
                    };
                    tracing::info!(
                        student_did = %state.student_did,
                        passes,
                        messages = state.messages().len(),
                        "run complete"
                    );
                    return Ok(content);
                }
            };
        }
    }
}

fn pending_tool_calls(message: &Message) -> Vec<ToolCallRequest> {
    match message {
        Message::Generated { tool_calls, .. } => tool_calls.clone(),
        _ => Vec::new(),
    }
}

/// Await a step, aborting it if the run's cancellation signal fires first
async fn guarded<T>(
    cancel: &CancellationToken,
    step: impl Future<Output = T>,
) -> Result<T, EngineError> {
    tokio::select! {
        () = cancel.cancelled() => Err(EngineError::Cancelled),
        value = step => Ok(value),
    }
}
