//! Run-level error taxonomy
//!
//! Only conditions fatal to a run appear here. Memory-provider failures
//! degrade to empty context inside collation, and per-call tool failures
//! become error-content tool results inside dispatch; neither crosses the
//! run boundary.

use crate::llm::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    /// The model capability failed; fatal, no internal retry
    #[error("model generation failed: {0}")]
    Generation(#[from] ModelError),

    /// The generate/dispatch cycle hit the hard pass limit
    #[error("generate loop exceeded {limit} passes")]
    LoopBoundExceeded { limit: u32 },

    /// The run's deadline or cancellation signal fired mid-cycle
    #[error("run cancelled before completion")]
    Cancelled,
}
