//! Telemetry event intake
//!
//! Routes app telemetry onto the persisted student state. This is the only
//! writer of `mode`: repeated help clicks flip a student to TEACHER mode,
//! which the chat engine observes on its next run.

use crate::db::{Database, DbResult};
use serde::Deserialize;
use serde_json::Value;

/// Inbound telemetry event
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetryEvent {
    pub event_type: String,
    pub creator_did: String,
    #[serde(default)]
    pub payload: Value,
}

pub struct EventProcessor {
    db: Database,
}

impl EventProcessor {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Apply one event. Unknown event types are accepted and ignored.
    pub fn handle(&self, event: &TelemetryEvent) -> DbResult<()> {
        match event.event_type.as_str() {
            "HELP_CLICK" => {
                self.db.record_help_click(&event.creator_did)?;
            }
            "PAGE_VIEW" => {
                if let Some(path) = event.payload.get("path").and_then(Value::as_str) {
                    self.db.set_current_quest(&event.creator_did, path)?;
                }
            }
            other => {
                tracing::debug!(event_type = other, "ignoring unhandled telemetry event");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::HELP_ABUSE_THRESHOLD;
    use crate::engine::Mode;
    use serde_json::json;

    fn event(event_type: &str, payload: Value) -> TelemetryEvent {
        TelemetryEvent {
            event_type: event_type.to_string(),
            creator_did: "did:student:1".to_string(),
            payload,
        }
    }

    #[test]
    fn help_clicks_flip_mode_at_the_abuse_threshold() {
        let db = Database::open_in_memory().unwrap();
        let processor = EventProcessor::new(db.clone());

        for _ in 0..HELP_ABUSE_THRESHOLD {
            processor.handle(&event("HELP_CLICK", Value::Null)).unwrap();
        }

        let state = db.get_student_state("did:student:1").unwrap().unwrap();
        assert_eq!(state.mode, Mode::Teacher);
        assert_eq!(state.help_click_count, HELP_ABUSE_THRESHOLD);
    }

    #[test]
    fn page_views_track_the_current_quest() {
        let db = Database::open_in_memory().unwrap();
        let processor = EventProcessor::new(db.clone());

        processor
            .handle(&event("PAGE_VIEW", json!({"path": "/quests/7"})))
            .unwrap();

        let state = db.get_student_state("did:student:1").unwrap().unwrap();
        assert_eq!(state.current_quest.as_deref(), Some("/quests/7"));
    }

    #[test]
    fn page_view_without_path_is_ignored() {
        let db = Database::open_in_memory().unwrap();
        let processor = EventProcessor::new(db.clone());
        processor.handle(&event("PAGE_VIEW", json!({}))).unwrap();
        assert!(db.get_student_state("did:student:1").unwrap().is_none());
    }

    #[test]
    fn unknown_event_types_are_accepted() {
        let db = Database::open_in_memory().unwrap();
        let processor = EventProcessor::new(db);
        processor
            .handle(&event("MOUSE_WIGGLE", Value::Null))
            .unwrap();
    }

    #[test]
    fn event_deserializes_from_camel_case_wire_form() {
        let event: TelemetryEvent = serde_json::from_value(json!({
            "eventType": "HELP_CLICK",
            "creatorDid": "did:student:9",
        }))
        .unwrap();
        assert_eq!(event.event_type, "HELP_CLICK");
        assert_eq!(event.creator_did, "did:student:9");
        assert_eq!(event.payload, Value::Null);
    }
}
