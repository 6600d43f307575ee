//! Quest navigation tool
//!
//! Emits a navigation signal for the app shell; the tool itself only
//! confirms the request so the model can narrate it to the student.

use super::{Tool, ToolOutput};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

pub struct NavigateTool;

#[derive(Debug, Deserialize)]
struct NavigateInput {
    path: String,
    reason: String,
}

#[async_trait]
impl Tool for NavigateTool {
    fn name(&self) -> &str {
        "navigate_to_quest"
    }

    fn description(&self) -> String {
        "Navigates the student to a specific quest or course page.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "required": ["path", "reason"],
            "properties": {
                "path": {
                    "type": "string",
                    "description": "The URL path to navigate to, e.g. /quests/123"
                },
                "reason": {
                    "type": "string",
                    "description": "The pedagogical reason for this navigation"
                }
            }
        })
    }

    async fn run(&self, input: Value) -> ToolOutput {
        match serde_json::from_value::<NavigateInput>(input) {
            Ok(nav) => {
                tracing::info!(path = %nav.path, reason = %nav.reason, "navigation requested");
                ToolOutput::success(format!("Successfully triggered navigation to {}", nav.path))
            }
            Err(e) => ToolOutput::error(format!("Invalid input: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn navigate_confirms_the_path() {
        let result = NavigateTool
            .run(json!({"path": "/quests/123", "reason": "review fractions"}))
            .await;
        assert!(result.success);
        assert!(result.output.contains("/quests/123"));
    }

    #[tokio::test]
    async fn navigate_rejects_missing_reason() {
        let result = NavigateTool.run(json!({"path": "/quests/123"})).await;
        assert!(!result.success);
    }
}
