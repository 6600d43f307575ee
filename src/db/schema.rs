//! Database schema and row types

use crate::engine::Mode;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// SQL schema for initialization
pub const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS student_state (
    student_did TEXT PRIMARY KEY,
    mode TEXT NOT NULL DEFAULT 'ASSISTANT',
    help_click_count INTEGER NOT NULL DEFAULT 0,
    last_help_at TEXT,
    current_quest TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS traits (
    student_did TEXT NOT NULL,
    name TEXT NOT NULL,
    value REAL NOT NULL,
    evidence TEXT,
    updated_at TEXT NOT NULL,

    PRIMARY KEY (student_did, name)
);

CREATE INDEX IF NOT EXISTS idx_traits_student ON traits(student_did);
";

/// Help clicks at or above this count flip the student to TEACHER mode
pub const HELP_ABUSE_THRESHOLD: i64 = 5;

/// Persisted per-student state. The chat engine reads this once at run
/// start; all writes happen through the telemetry path.
#[derive(Debug, Clone, Serialize)]
pub struct StudentState {
    pub student_did: String,
    pub mode: Mode,
    pub help_click_count: i64,
    pub last_help_at: Option<DateTime<Utc>>,
    pub current_quest: Option<String>,
}

/// One observed trait with supporting evidence
#[derive(Debug, Clone, Serialize)]
pub struct TraitRecord {
    pub name: String,
    pub value: f64,
    pub evidence: Option<String>,
}
