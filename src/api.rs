//! HTTP API for the tutor service

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::db::Database;
use crate::llm::ModelClient;
use crate::memory::MemoryProvider;
use crate::tools::SearchConfig;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub memory: Arc<dyn MemoryProvider>,
    pub model: Arc<dyn ModelClient>,
    pub search: Option<SearchConfig>,
    pub run_timeout: Duration,
}

impl AppState {
    pub fn new(
        db: Database,
        memory: Arc<dyn MemoryProvider>,
        model: Arc<dyn ModelClient>,
        search: Option<SearchConfig>,
        run_timeout: Duration,
    ) -> Self {
        Self {
            db,
            memory,
            model,
            search,
            run_timeout,
        }
    }
}
