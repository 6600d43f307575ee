//! Common types for model interactions

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single tool invocation requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallRequest {
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

impl ToolCallRequest {
    #[allow(dead_code)] // Constructor for API completeness
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments,
        }
    }
}

/// One entry in a conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Message {
    /// Student-authored text
    Human { content: String },
    /// Model output; terminal iff `tool_calls` is empty
    Generated {
        content: String,
        #[serde(default)]
        tool_calls: Vec<ToolCallRequest>,
    },
    /// Resolved tool call, correlated to its request by `call_id`
    ToolResult { call_id: String, content: String },
}

impl Message {
    pub fn human(content: impl Into<String>) -> Self {
        Message::Human {
            content: content.into(),
        }
    }

    /// A terminal generated message (no tool calls)
    #[allow(dead_code)] // Useful for tests
    pub fn generated(content: impl Into<String>) -> Self {
        Message::Generated {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    #[allow(dead_code)] // Useful for tests
    pub fn generated_with_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCallRequest>,
    ) -> Self {
        Message::Generated {
            content: content.into(),
            tool_calls,
        }
    }

    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Message::ToolResult {
            call_id: call_id.into(),
            content: content.into(),
        }
    }
}

/// Tool made available to the model for potential invocation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Model request
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system: String,
    pub messages: Vec<Message>,
    pub tools: Vec<ToolSpec>,
}

/// Model reply, normalized from the provider wire format
#[derive(Debug, Clone)]
pub struct ModelReply {
    pub content: String,
    pub tool_calls: Vec<ToolCallRequest>,
}

impl ModelReply {
    /// Convert into the transcript message it represents
    pub fn into_message(self) -> Message {
        Message::Generated {
            content: self.content,
            tool_calls: self.tool_calls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn message_serde_is_tagged() {
        let msg = Message::tool_result("c1", "done");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "tool_result");
        assert_eq!(value["call_id"], "c1");
    }

    #[test]
    fn generated_tool_calls_default_to_empty() {
        let value = json!({ "type": "generated", "content": "hi" });
        let msg: Message = serde_json::from_value(value).unwrap();
        assert_eq!(msg, Message::generated("hi"));
    }

    #[test]
    fn reply_into_message_preserves_calls() {
        let reply = ModelReply {
            content: String::new(),
            tool_calls: vec![ToolCallRequest::new("c1", "web_search", json!({"query": "x"}))],
        };
        match reply.into_message() {
            Message::Generated { tool_calls, .. } => assert_eq!(tool_calls.len(), 1),
            other => panic!("unexpected message: {other:?}"),
        }
    }
}
