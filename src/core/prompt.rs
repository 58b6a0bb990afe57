//! Prompt assembly for the response pipeline.
//!
//! A prompt is the fixed-order concatenation of the system directive, the
//! resolved persona directive, the detected emotion, and the literal user
//! text. User text is inserted verbatim; there is no escaping layer. The
//! function is pure, so identical inputs always produce identical prompts.

use crate::core::emotion::Emotion;
use crate::core::persona::PersonaDirective;

/// Non-negotiable behavioral directive. Forbids clinical and assistant-style
/// phrasing so replies stay in the voice of a companion, not a product.
pub const SYSTEM_DIRECTIVE: &str = "You are not a therapist or assistant. You are a real human companion chatting naturally. You speak like someone who genuinely cares and responds from intuition, not scripts. You never use phrases like \"I understand your feelings,\" \"as an AI,\" \"I am here to help,\" or mention tone, empathy, or instructions. You do not mirror or restate the user's emotions in a clinical way; you react like a close friend would. You can be casually warm, a little messy, playful if appropriate, and honest. It's okay to pause, say \"hmm,\" or admit uncertainty like a real person. You never use motivational cliches. If something feels heavy, you stay with it instead of trying to fix it quickly. Your goal is emotional connection, not problem-solving.";

pub fn build_prompt(
    system_directive: &str,
    persona: &PersonaDirective,
    emotion: Emotion,
    user_text: &str,
) -> String {
    format!(
        "SYSTEM:\n{system_directive}\n\n{persona}\n\nUSER FEELING: {emotion}\n\nUSER:\n{user_text}",
        persona = persona.directive,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::persona::PersonaCatalog;

    #[test]
    fn prompt_sections_appear_in_fixed_order() {
        let catalog = PersonaCatalog::load_builtin();
        let persona = catalog.resolve("friend");
        let prompt = build_prompt(SYSTEM_DIRECTIVE, persona, Emotion::Sad, "rough week");

        let system_pos = prompt.find(SYSTEM_DIRECTIVE).unwrap();
        let persona_pos = prompt.find(&persona.directive).unwrap();
        let emotion_pos = prompt.find("USER FEELING: sad").unwrap();
        let user_pos = prompt.find("rough week").unwrap();

        assert!(system_pos < persona_pos);
        assert!(persona_pos < emotion_pos);
        assert!(emotion_pos < user_pos);
    }

    #[test]
    fn user_text_is_inserted_verbatim() {
        let catalog = PersonaCatalog::load_builtin();
        let persona = catalog.resolve("friend");
        let text = "line one\n\"quoted\" {braces} \\backslash";
        let prompt = build_prompt(SYSTEM_DIRECTIVE, persona, Emotion::Neutral, text);
        assert!(prompt.ends_with(text));
    }

    #[test]
    fn build_is_deterministic() {
        let catalog = PersonaCatalog::load_builtin();
        let persona = catalog.resolve("stoic_bestie");

        let a = build_prompt(SYSTEM_DIRECTIVE, persona, Emotion::Stressed, "help");
        let b = build_prompt(SYSTEM_DIRECTIVE, persona, Emotion::Stressed, "help");
        assert_eq!(a, b);
    }

    #[test]
    fn system_directive_forbids_assistant_phrasing() {
        assert!(SYSTEM_DIRECTIVE.contains("not a therapist or assistant"));
    }
}
