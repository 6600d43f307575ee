//! Student progress lookup tool

use super::{Tool, ToolOutput};
use crate::db::Database;
use async_trait::async_trait;
use serde_json::{json, Value};

/// Reports quest progress from the persisted student state. Bound to one
/// student at registry construction; takes no arguments from the model.
pub struct ProgressTool {
    db: Database,
    student_did: String,
}

impl ProgressTool {
    pub fn new(db: Database, student_did: impl Into<String>) -> Self {
        Self {
            db,
            student_did: student_did.into(),
        }
    }
}

#[async_trait]
impl Tool for ProgressTool {
    fn name(&self) -> &str {
        "check_student_progress"
    }

    fn description(&self) -> String {
        "Checks the completion status of current quests for the student.".to_string()
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {}
        })
    }

    async fn run(&self, _input: Value) -> ToolOutput {
        match self.db.get_student_state(&self.student_did) {
            Ok(Some(state)) => {
                let quest = state.current_quest.as_deref().unwrap_or("no active quest");
                ToolOutput::success(format!(
                    "Student is currently on '{}'. Help requests so far: {}.",
                    quest, state.help_click_count
                ))
            }
            Ok(None) => ToolOutput::success("No recorded progress for this student yet."),
            Err(e) => ToolOutput::error(format!("Progress lookup failed: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn progress_reports_current_quest() {
        let db = Database::open_in_memory().unwrap();
        db.set_current_quest("did:1", "/quests/ancient-egypt").unwrap();
        let tool = ProgressTool::new(db, "did:1");
        let result = tool.run(json!({})).await;
        assert!(result.success);
        assert!(result.output.contains("/quests/ancient-egypt"));
    }

    #[tokio::test]
    async fn progress_handles_unknown_student() {
        let db = Database::open_in_memory().unwrap();
        let tool = ProgressTool::new(db, "did:unknown");
        let result = tool.run(json!({})).await;
        assert!(result.success);
        assert!(result.output.contains("No recorded progress"));
    }
}
