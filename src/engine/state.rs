//! Conversation state threaded through one orchestration run

use crate::llm::Message;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavior mode, read once from persisted student state at run start.
/// Transitions between modes are owned by the telemetry collaborator; the
/// engine only observes the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    #[default]
    Assistant,
    Teacher,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Assistant => "ASSISTANT",
            Mode::Teacher => "TEACHER",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ASSISTANT" => Some(Mode::Assistant),
            "TEACHER" => Some(Mode::Teacher),
            _ => None,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Context gathered by collation; overwritten wholesale on each pass,
/// never accumulated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollatedContext {
    /// Personal-history snippets, newline-joined
    pub memory: String,
    /// Curated pedagogical snippets, newline-joined
    pub worldview: String,
}

/// State record owned exclusively by one orchestration run.
///
/// The transcript is append-only: a run's only side effect on `messages`
/// is pushing new entries, which keeps the partial sequence available for
/// diagnostics when a run fails mid-cycle.
#[derive(Debug)]
pub struct ConversationState {
    pub student_did: String,
    pub mode: Mode,
    messages: Vec<Message>,
    pub context: CollatedContext,
}

impl ConversationState {
    pub fn new(student_did: impl Into<String>, mode: Mode) -> Self {
        Self {
            student_did: student_did.into(),
            mode,
            messages: Vec::new(),
            context: CollatedContext::default(),
        }
    }

    /// Append a message to the transcript
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Text of the most recent human message, used as the retrieval query
    pub fn last_human_text(&self) -> Option<&str> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Human { content } => Some(content.as_str()),
            _ => None,
        })
    }

    /// Replace the collated context (overwrite, not merge)
    pub fn set_context(&mut self, context: CollatedContext) {
        self.context = context;
    }
}
