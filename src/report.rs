//! Student progress report

use crate::db::{Database, DbResult, StudentState};
use crate::engine::Mode;

/// Render the markdown progress report for one student. Students with no
/// persisted state get a report with defaults rather than an error.
pub fn generate_student_report(db: &Database, student_did: &str) -> DbResult<String> {
    let state = db.get_student_state(student_did)?;
    let traits = db.list_traits(student_did)?;

    let mode = state.as_ref().map_or(Mode::Assistant, |s| s.mode);
    let quest = state
        .as_ref()
        .and_then(|s: &StudentState| s.current_quest.as_deref())
        .unwrap_or("None");
    let help_count = state.as_ref().map_or(0, |s| s.help_click_count);

    let trait_lines = if traits.is_empty() {
        "- No traits recorded yet".to_string()
    } else {
        traits
            .iter()
            .map(|t| {
                format!(
                    "- **{}**: {:.2} ({})",
                    t.name,
                    t.value,
                    t.evidence.as_deref().unwrap_or("No evidence yet")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    Ok(format!(
        "# Student Progress Report: {student_did}\n\
**Mode**: {mode}\n\
\n\
## Traits & Growth\n\
{trait_lines}\n\
\n\
## Recent Activity\n\
- **Current Quest**: {quest}\n\
- **Help Requests**: {help_count}"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_renders_state_and_traits() {
        let db = Database::open_in_memory().unwrap();
        db.set_current_quest("did:1", "/quests/ancient-egypt").unwrap();
        db.upsert_trait("did:1", "persistence", 0.75, Some("finished a hard quest"))
            .unwrap();

        let report = generate_student_report(&db, "did:1").unwrap();
        assert!(report.contains("# Student Progress Report: did:1"));
        assert!(report.contains("**Mode**: ASSISTANT"));
        assert!(report.contains("**persistence**: 0.75 (finished a hard quest)"));
        assert!(report.contains("**Current Quest**: /quests/ancient-egypt"));
    }

    #[test]
    fn report_for_unknown_student_uses_defaults() {
        let db = Database::open_in_memory().unwrap();
        let report = generate_student_report(&db, "did:ghost").unwrap();
        assert!(report.contains("**Mode**: ASSISTANT"));
        assert!(report.contains("**Current Quest**: None"));
        assert!(report.contains("No traits recorded yet"));
    }
}
