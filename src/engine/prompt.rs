//! System instruction template
//!
//! The instruction differs by mode: TEACHER framing is firmer and leads
//! with foundational concepts, ASSISTANT framing stays suggestive.

use super::state::{CollatedContext, Mode};

pub fn build_system_instruction(mode: Mode, context: &CollatedContext) -> String {
    let mode_directive = match mode {
        Mode::Assistant => "Offer hints and encouragement; let the student keep the lead.",
        Mode::Teacher => {
            "Be firm and prioritize foundational concepts over hints; do not soften gaps in understanding."
        }
    };

    format!(
        "You are the PersonalAITutor, a proactive and Socratic companion for a student.\n\
CURRENT MODE: {mode}\n\
{mode_directive}\n\
\n\
PHILOSOPHY:\n\
- Never give the answer directly.\n\
- Use analogies, especially from the provided worldview context.\n\
- Suggest, don't force.\n\
\n\
WORLDVIEW CONTEXT:\n\
{worldview}\n\
\n\
STUDENT MEMORY:\n\
{memory}\n\
\n\
You have tools to search the internet, navigate the app, and check quest progress. \
Use them if they help the student decide.",
        worldview = context.worldview,
        memory = context.memory,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> CollatedContext {
        CollatedContext {
            memory: "prefers visual analogies".to_string(),
            worldview: "stewardship parable".to_string(),
        }
    }

    #[test]
    fn instruction_embeds_both_context_blocks() {
        let instruction = build_system_instruction(Mode::Assistant, &test_context());
        assert!(instruction.contains("prefers visual analogies"));
        assert!(instruction.contains("stewardship parable"));
    }

    #[test]
    fn teacher_mode_is_firmer_than_assistant() {
        let assistant = build_system_instruction(Mode::Assistant, &test_context());
        let teacher = build_system_instruction(Mode::Teacher, &test_context());
        assert_ne!(assistant, teacher);
        assert!(teacher.contains("CURRENT MODE: TEACHER"));
        assert!(teacher.contains("foundational concepts"));
        assert!(assistant.contains("CURRENT MODE: ASSISTANT"));
    }

    #[test]
    fn empty_context_still_renders_sections() {
        let instruction =
            build_system_instruction(Mode::Assistant, &CollatedContext::default());
        assert!(instruction.contains("WORLDVIEW CONTEXT:"));
        assert!(instruction.contains("STUDENT MEMORY:"));
    }
}
