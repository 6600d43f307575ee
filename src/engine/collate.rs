//! Context collation
//!
//! Gathers the two advisory context blobs (personal history, curated
//! worldview material) ahead of each run. Retrieval failures degrade to
//! empty strings; context is never required for a run to complete.

use super::state::CollatedContext;
use crate::memory::{MemoryError, MemoryProvider, Snippet};
use std::sync::Arc;

/// Personal-history snippets fetched per collation
pub const PERSONAL_SNIPPETS: usize = 5;
/// Curated worldview snippets fetched per collation
pub const WORLDVIEW_SNIPPETS: usize = 3;

pub struct ContextCollator {
    memory: Arc<dyn MemoryProvider>,
}

impl ContextCollator {
    pub fn new(memory: Arc<dyn MemoryProvider>) -> Self {
        Self { memory }
    }

    /// Issue both retrievals concurrently and join each result list's text
    /// fields with newlines. Both keys are always present in the output.
    pub async fn collate(&self, student_did: &str, query: &str) -> CollatedContext {
        let (personal, worldview) = tokio::join!(
            self.memory
                .retrieve_context(student_did, query, PERSONAL_SNIPPETS),
            self.memory.retrieve_worldview_context(query, WORLDVIEW_SNIPPETS),
        );

        CollatedContext {
            memory: join_or_empty(personal, "memory"),
            worldview: join_or_empty(worldview, "worldview"),
        }
    }
}

fn join_or_empty(result: Result<Vec<Snippet>, MemoryError>, source: &str) -> String {
    match result {
        Ok(snippets) => snippets
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join("\n"),
        Err(e) => {
            tracing::warn!(source, error = %e, "context retrieval failed, degrading to empty");
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedMemoryProvider;

    #[tokio::test]
    async fn collate_joins_snippets_with_newlines() {
        let provider = ScriptedMemoryProvider::with_snippets(
            vec!["asked about fractions", "struggled with division"],
            vec!["pizza analogy"],
        );
        let collator = ContextCollator::new(Arc::new(provider));
        let context = collator.collate("did:1", "fractions").await;
        assert_eq!(context.memory, "asked about fractions\nstruggled with division");
        assert_eq!(context.worldview, "pizza analogy");
    }

    #[tokio::test]
    async fn collate_degrades_to_empty_on_provider_failure() {
        let collator = ContextCollator::new(Arc::new(ScriptedMemoryProvider::failing()));
        let context = collator.collate("did:1", "fractions").await;
        assert_eq!(context.memory, "");
        assert_eq!(context.worldview, "");
    }

    #[tokio::test]
    async fn collate_renders_empty_results_as_empty_strings() {
        let collator = ContextCollator::new(Arc::new(ScriptedMemoryProvider::empty()));
        let context = collator.collate("did:1", "fractions").await;
        assert_eq!(context, CollatedContext::default());
    }

    #[tokio::test]
    async fn collate_is_deterministic_for_identical_inputs() {
        let collator = ContextCollator::new(Arc::new(ScriptedMemoryProvider::with_snippets(
            vec!["a", "b"],
            vec!["c"],
        )));
        let first = collator.collate("did:1", "query").await;
        let second = collator.collate("did:1", "query").await;
        assert_eq!(first, second);
    }
}
