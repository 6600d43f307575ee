//! Response generation
//!
//! Builds the mode-specific system instruction, hands the full transcript
//! and tool specifications to the model capability, and returns the single
//! generated message. A model failure is fatal to the run; retry policy,
//! if any, belongs to whatever wraps the run.

use super::prompt::build_system_instruction;
use super::state::{CollatedContext, Mode};
use crate::llm::{Message, ModelClient, ModelError, ModelRequest, ToolSpec};
use std::sync::Arc;

pub struct ResponseGenerator {
    model: Arc<dyn ModelClient>,
}

impl ResponseGenerator {
    pub fn new(model: Arc<dyn ModelClient>) -> Self {
        Self { model }
    }

    pub async fn generate(
        &self,
        mode: Mode,
        context: &CollatedContext,
        messages: &[Message],
        tools: &[ToolSpec],
    ) -> Result<Message, ModelError> {
        let request = ModelRequest {
            system: build_system_instruction(mode, context),
            messages: messages.to_vec(),
            tools: tools.to_vec(),
        };

        let reply = self.model.invoke(&request).await?;
        tracing::debug!(
            tool_calls = reply.tool_calls.len(),
            "generated message received"
        );
        Ok(reply.into_message())
    }
}
