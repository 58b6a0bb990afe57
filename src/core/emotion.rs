//! Coarse keyword-based emotion tagging for user messages.
//!
//! This is deliberately not an NLP system. A fixed word list is matched as
//! substrings of the lower-cased text, and the stress set is checked first so
//! that a message mixing stress and happy words still reads as stressed. That
//! ordering errs toward acknowledging distress and must not be reordered.

use serde::{Deserialize, Serialize};
use std::fmt;

const STRESS_WORDS: &[&str] = &["anxious", "worried", "stressed", "overwhelmed", "panic"];
const HAPPY_WORDS: &[&str] = &["happy", "excited", "great", "wonderful", "amazing"];
const SAD_WORDS: &[&str] = &["sad", "depressed", "down", "upset", "cry"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Calm,
    Stressed,
    Happy,
    Sad,
    Neutral,
}

impl Emotion {
    pub fn as_str(self) -> &'static str {
        match self {
            Emotion::Calm => "calm",
            Emotion::Stressed => "stressed",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tag a message with one coarse emotion.
///
/// Matching is substring-based, not tokenized: "unhappy" matches "happy" and
/// "download" matches "down". This mirrors the behavior the rest of the app
/// was tuned against. `Calm` is never produced here; it is only ever assigned
/// to assistant turns.
pub fn classify(text: &str) -> Emotion {
    let lower = text.to_lowercase();

    if STRESS_WORDS.iter().any(|w| lower.contains(w)) {
        return Emotion::Stressed;
    }
    if HAPPY_WORDS.iter().any(|w| lower.contains(w)) {
        return Emotion::Happy;
    }
    if SAD_WORDS.iter().any(|w| lower.contains(w)) {
        return Emotion::Sad;
    }
    Emotion::Neutral
}
