//! Chat session: the append-only message transcript and the glue that runs
//! the response pipeline for each user submission.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;

use crate::core::emotion::{self, Emotion};
use crate::core::persona::PersonaCatalog;
use crate::core::prompt::{build_prompt, SYSTEM_DIRECTIVE};
use crate::core::providers::ProviderChain;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

impl Sender {
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    /// Unique within the session, assigned monotonically.
    pub id: u64,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    pub emotion: Option<Emotion>,
    pub suggested_actions: Option<Vec<String>>,
}

/// One session owns its transcript, persona choice, and provider chain.
/// Nothing is shared between concurrent sessions, so no synchronization is
/// needed. The transcript is append-only: messages are never edited or
/// removed once pushed.
pub struct ChatSession {
    catalog: PersonaCatalog,
    chain: ProviderChain,
    persona_key: String,
    messages: Vec<Message>,
    next_id: u64,
}

impl ChatSession {
    pub fn new(catalog: PersonaCatalog, chain: ProviderChain, persona_key: impl Into<String>) -> Self {
        ChatSession {
            catalog,
            chain,
            persona_key: persona_key.into(),
            messages: Vec::new(),
            next_id: 1,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn persona_key(&self) -> &str {
        &self.persona_key
    }

    pub fn set_persona(&mut self, key: impl Into<String>) {
        self.persona_key = key.into();
    }

    /// Opening assistant turn shown when a session starts interactively.
    pub fn push_greeting(&mut self, name: Option<&str>) -> &Message {
        let content = match name {
            Some(name) => {
                format!("Hello {name}! I'm here to support you today. How are you feeling?")
            }
            None => "Hello! I'm here to support you today. How are you feeling?".to_string(),
        };
        let index = self.push(content, Sender::Assistant, Some(Emotion::Calm), None);
        &self.messages[index]
    }

    /// Run the full pipeline for one user submission: classify the emotion,
    /// build the prompt, ask the provider chain, and append both turns.
    ///
    /// Returns the appended user and assistant messages in that order. Each
    /// request is stateless from the providers' perspective; the transcript
    /// stays local.
    pub async fn send_user_message(&mut self, text: &str) -> (&Message, &Message) {
        let detected = emotion::classify(text);
        debug!(emotion = detected.as_str(), "classified user message");

        let persona = self.catalog.resolve(&self.persona_key);
        let prompt = build_prompt(SYSTEM_DIRECTIVE, persona, detected, text);

        let reply = self.chain.respond(&prompt).await;

        let user_index = self.push(text.to_string(), Sender::User, Some(detected), None);
        let assistant_index = self.push(
            reply,
            Sender::Assistant,
            Some(Emotion::Calm),
            suggested_actions_for(detected),
        );

        (&self.messages[user_index], &self.messages[assistant_index])
    }

    fn push(
        &mut self,
        content: String,
        sender: Sender,
        emotion: Option<Emotion>,
        suggested_actions: Option<Vec<String>>,
    ) -> usize {
        let message = Message {
            id: self.next_id,
            content,
            sender,
            timestamp: Utc::now(),
            emotion,
            suggested_actions,
        };
        self.next_id += 1;
        self.messages.push(message);
        self.messages.len() - 1
    }
}

/// Gentle nudges attached to replies when the user sounds distressed, shown
/// as quick actions in the interface.
fn suggested_actions_for(emotion: Emotion) -> Option<Vec<String>> {
    match emotion {
        Emotion::Stressed => Some(vec![
            "Try a breathing exercise".to_string(),
            "Ground yourself with 5-4-3-2-1".to_string(),
        ]),
        Emotion::Sad => Some(vec![
            "Write it down in the journal".to_string(),
            "Try a breathing exercise".to_string(),
        ]),
        _ => None,
    }
}
