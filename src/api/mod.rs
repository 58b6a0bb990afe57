//! Wire payloads for the remote text-generation providers.
//!
//! The primary provider speaks an OpenAI-style chat-completion protocol; the
//! secondary provider speaks a bare text-inference protocol where the prompt
//! travels under an `inputs` field and replies come back as a sequence.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Clone)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
pub struct ChatResponseMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub struct ChatResponseChoice {
    pub message: ChatResponseMessage,
}

#[derive(Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatResponseChoice>,
}

#[derive(Serialize)]
pub struct InferenceRequest {
    pub inputs: String,
}

#[derive(Deserialize)]
pub struct GeneratedText {
    pub generated_text: Option<String>,
}

impl ChatRequest {
    /// Build a single-turn request. The pipeline is stateless upstream: no
    /// conversation history is ever sent, only the current prompt.
    pub fn single_turn(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        ChatRequest {
            model: model.into(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.into(),
            }],
        }
    }
}
