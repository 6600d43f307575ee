//! Tool implementations available to the tutor

mod navigate;
mod progress;
mod web_search;

pub use navigate::NavigateTool;
pub use progress::ProgressTool;
pub use web_search::{SearchConfig, WebSearchTool};

use crate::db::Database;
use crate::llm::ToolSpec;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Result from tool execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub output: String,
}

impl ToolOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            output: message.into(),
        }
    }
}

/// Trait for tools the model may invoke
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name
    fn name(&self) -> &str;

    /// Tool description for the model
    fn description(&self) -> String;

    /// JSON schema for tool input
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn run(&self, input: Value) -> ToolOutput;
}

/// Collection of tools bound to one orchestration run
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Standard registry for a student's chat run. Search is only offered
    /// when a search backend is configured.
    pub fn for_student(student_did: &str, db: Database, search: Option<SearchConfig>) -> Self {
        let mut tools: Vec<Arc<dyn Tool>> = vec![
            Arc::new(NavigateTool),
            Arc::new(ProgressTool::new(db, student_did)),
        ];
        if let Some(config) = search {
            tools.push(Arc::new(WebSearchTool::new(config)));
        }
        Self { tools }
    }

    /// Registry over an explicit tool set
    pub fn from_tools(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    /// Get all tool definitions for the model call
    pub fn definitions(&self) -> Vec<ToolSpec> {
        self.tools
            .iter()
            .map(|t| ToolSpec {
                name: t.name().to_string(),
                description: t.description(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Execute a tool by name; `None` means the name is not registered
    pub async fn execute(&self, name: &str, input: Value) -> Option<ToolOutput> {
        for tool in &self.tools {
            if tool.name() == name {
                return Some(tool.run(input).await);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn execute_unknown_tool_returns_none() {
        let registry = ToolRegistry::from_tools(vec![Arc::new(NavigateTool)]);
        assert!(registry.execute("imaginary_tool", json!({})).await.is_none());
    }

    #[test]
    fn definitions_cover_all_registered_tools() {
        let db = Database::open_in_memory().unwrap();
        let registry = ToolRegistry::for_student("did:1", db, None);
        let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
        assert_eq!(names, vec!["navigate_to_quest", "check_student_progress"]);
    }

    #[test]
    fn search_tool_is_offered_only_when_configured() {
        let db = Database::open_in_memory().unwrap();
        let registry = ToolRegistry::for_student(
            "did:1",
            db,
            Some(SearchConfig::new("key".to_string())),
        );
        assert!(registry
            .definitions()
            .iter()
            .any(|d| d.name == "web_search"));
    }
}
