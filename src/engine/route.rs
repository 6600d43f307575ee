//! Continuation routing
//!
//! Pure decision over the shape of the last generated message. Content is
//! never inspected; only the presence of pending tool calls matters.

use crate::llm::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Pending tool calls must be dispatched before generating again
    Continue,
    /// The last message is terminal; the run is done
    End,
}

#[must_use]
pub fn route(last_message: &Message) -> Decision {
    match last_message {
        Message::Generated { tool_calls, .. } if !tool_calls.is_empty() => Decision::Continue,
        _ => Decision::End,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ToolCallRequest;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn terminal_generated_message_ends_the_run() {
        assert_eq!(route(&Message::generated("all done")), Decision::End);
    }

    #[test]
    fn pending_tool_calls_continue_the_run() {
        let message = Message::generated_with_calls(
            "",
            vec![ToolCallRequest::new("c1", "check_student_progress", json!({}))],
        );
        assert_eq!(route(&message), Decision::Continue);
    }

    #[test]
    fn non_generated_messages_end_the_run() {
        assert_eq!(route(&Message::human("hello")), Decision::End);
        assert_eq!(route(&Message::tool_result("c1", "ok")), Decision::End);
    }

    fn arb_tool_call() -> impl Strategy<Value = ToolCallRequest> {
        ("[a-z0-9]{4,10}", "[a-z_]{3,20}")
            .prop_map(|(id, name)| ToolCallRequest::new(id, name, json!({})))
    }

    proptest! {
        #[test]
        fn any_nonempty_call_list_continues(calls in prop::collection::vec(arb_tool_call(), 1..8)) {
            let message = Message::generated_with_calls("text", calls);
            prop_assert_eq!(route(&message), Decision::Continue);
        }

        #[test]
        fn routing_ignores_content(content in ".{0,80}") {
            prop_assert_eq!(route(&Message::generated(content)), Decision::End);
        }
    }
}
