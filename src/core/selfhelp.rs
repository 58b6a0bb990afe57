//! Static self-help content: reflective journaling prompts and the 5-4-3-2-1
//! grounding walk-through.

pub const JOURNALING_PROMPTS: &[&str] = &[
    "What am I feeling right now, and what might be causing these feelings?",
    "What thoughts are going through my mind? Are they helpful or unhelpful?",
    "What evidence do I have for and against this thought?",
    "How would I advise a friend who was thinking this way?",
    "What's one thing I'm grateful for today?",
    "What's a small step I can take to improve my situation?",
    "What did I learn about myself today?",
    "How did I show kindness to myself or others today?",
];

/// Senses and instructions for the 5-4-3-2-1 grounding technique, in order.
pub const GROUNDING_STEPS: &[(&str, &str)] = &[
    ("See", "Name 5 things you can see around you"),
    ("Touch", "Name 4 things you can touch"),
    ("Hear", "Name 3 things you can hear"),
    ("Smell", "Name 2 things you can smell"),
    ("Taste", "Name 1 thing you can taste"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grounding_counts_down_from_five() {
        assert_eq!(GROUNDING_STEPS.len(), 5);
        for (i, (_, instruction)) in GROUNDING_STEPS.iter().enumerate() {
            let expected = format!("Name {} thing", 5 - i);
            assert!(
                instruction.starts_with(&expected),
                "step {i} should start with '{expected}': {instruction}"
            );
        }
    }

    #[test]
    fn journaling_prompts_are_questions() {
        assert!(!JOURNALING_PROMPTS.is_empty());
        for prompt in JOURNALING_PROMPTS {
            assert!(prompt.ends_with('?'));
        }
    }
}
