//! API request and response types

use crate::engine::Mode;
use serde::{Deserialize, Serialize};

/// Request to chat with the tutor
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub student_did: String,
    pub message: String,
}

/// Response for a completed chat run
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub mode: Mode,
}

/// Health probe payload
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Acknowledgement for accepted telemetry
#[derive(Debug, Serialize)]
pub struct EventAccepted {
    pub success: bool,
}

/// Student summary payload
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub report: String,
}

/// Generic error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
