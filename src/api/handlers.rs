//! HTTP request handlers

use super::types::{
    ChatRequest, ChatResponse, ErrorResponse, EventAccepted, HealthResponse, SummaryResponse,
};
use super::AppState;
use crate::engine::{ConversationState, Orchestrator};
use crate::events::{EventProcessor, TelemetryEvent};
use crate::llm::Message;
use crate::report::generate_student_report;
use crate::tools::ToolRegistry;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/chat", post(chat))
        .route("/events", post(ingest_event))
        .route("/student/:did/summary", get(student_summary))
        .with_state(state)
}

// ============================================================
// Health
// ============================================================

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "tutor-agent".to_string(),
    })
}

// ============================================================
// Chat
// ============================================================

async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let run_id = uuid::Uuid::new_v4();

    // Mode is read once at run start; a stale read is acceptable.
    let mode = state
        .db
        .get_student_state(&req.student_did)
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map(|s| s.mode)
        .unwrap_or_default();

    let registry = Arc::new(ToolRegistry::for_student(
        &req.student_did,
        state.db.clone(),
        state.search.clone(),
    ));
    let orchestrator = Orchestrator::new(
        Arc::clone(&state.memory),
        Arc::clone(&state.model),
        registry,
    );

    let mut conversation = ConversationState::new(&req.student_did, mode);
    conversation.push(Message::human(&req.message));

    // Per-run deadline: the timer cancels the run's token, which aborts
    // whatever step is in flight.
    let cancel = CancellationToken::new();
    let deadline = cancel.clone();
    let run_timeout = state.run_timeout;
    tokio::spawn(async move {
        tokio::time::sleep(run_timeout).await;
        deadline.cancel();
    });

    match orchestrator.run(&mut conversation, &cancel).await {
        Ok(response) => Ok(Json(ChatResponse { response, mode })),
        Err(e) => {
            tracing::error!(
                run_id = %run_id,
                student_did = %req.student_did,
                error = %e,
                transcript_len = conversation.messages().len(),
                "tutor run failed"
            );
            Err(AppError::Engine)
        }
    }
}

// ============================================================
// Telemetry
// ============================================================

async fn ingest_event(
    State(state): State<AppState>,
    Json(event): Json<TelemetryEvent>,
) -> Result<(StatusCode, Json<EventAccepted>), AppError> {
    EventProcessor::new(state.db.clone())
        .handle(&event)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok((StatusCode::ACCEPTED, Json(EventAccepted { success: true })))
}

// ============================================================
// Student Summary
// ============================================================

async fn student_summary(
    State(state): State<AppState>,
    Path(did): Path<String>,
) -> Result<Json<SummaryResponse>, AppError> {
    let report = generate_student_report(&state.db, &did)
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(Json(SummaryResponse { report }))
}

// ============================================================
// Error Handling
// ============================================================

enum AppError {
    /// Engine run failure; the body stays generic so internal message
    /// structures never leak to the client
    Engine,
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Engine => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "tutor engine failure".to_string(),
            ),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
