//! Remote text-generation providers and the fallback chain.
//!
//! Providers are tried strictly in priority order, one attempt each, and any
//! kind of failure (transport, status, timeout, unusable payload) just means
//! "try the next one". The chain never fails at its boundary: when every
//! provider is exhausted it returns a fixed in-voice reply instead of an
//! error, so the conversation degrades without ever sounding broken.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{ChatRequest, ChatResponse, GeneratedText, InferenceRequest};
use crate::utils::url::construct_api_url;

/// Terminal reply when every provider has failed. Part of the persona
/// contract: it acknowledges the connectivity problem without reading like a
/// system error.
pub const FALLBACK_REPLY: &str =
    "I'm still here with you. Even if I'm facing connection issues, your feelings matter. Talk to me — I'm listening.";

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug)]
pub enum ProviderError {
    /// Transport-level failure (DNS, TLS, connection reset).
    Http(reqwest::Error),
    /// The provider answered with a non-success status code.
    Status {
        status: reqwest::StatusCode,
        detail: Option<String>,
    },
    /// The attempt exceeded the per-provider time limit.
    Timeout(Duration),
    /// The response body did not have the documented shape.
    BadPayload(String),
    /// The response parsed but carried no usable reply text.
    EmptyReply,
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(err) => write!(f, "request failed: {err}"),
            ProviderError::Status { status, detail } => match detail {
                Some(detail) => write!(f, "unexpected status {status}: {detail}"),
                None => write!(f, "unexpected status {status}"),
            },
            ProviderError::Timeout(limit) => {
                write!(f, "no reply within {}s", limit.as_secs())
            }
            ProviderError::BadPayload(detail) => write!(f, "unusable payload: {detail}"),
            ProviderError::EmptyReply => write!(f, "reply field missing or empty"),
        }
    }
}

impl Error for ProviderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ProviderError::Http(err) => Some(err),
            _ => None,
        }
    }
}

/// A remote text-generation backend: takes a prompt, returns generated text
/// or a failure. Implementations perform exactly one network call per
/// `generate` invocation; retry policy belongs to the chain, not here.
#[async_trait]
pub trait Provider: Send + Sync {
    fn name(&self) -> &str;
    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Primary provider: OpenAI-style chat-completion endpoint (OpenRouter in the
/// default configuration). The reply is read from
/// `choices[0].message.content`.
pub struct ChatCompletionProvider {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl ChatCompletionProvider {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        ChatCompletionProvider {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

#[async_trait]
impl Provider for ChatCompletionProvider {
    fn name(&self) -> &str {
        "chat-completion"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let url = construct_api_url(&self.base_url, "chat/completions");
        let request = ChatRequest::single_turn(self.model.as_str(), prompt);

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status,
                detail: error_summary(&body),
            });
        }

        let payload: ChatResponse = response
            .json()
            .await
            .map_err(|err| ProviderError::BadPayload(err.to_string()))?;

        extract_reply(
            payload
                .choices
                .into_iter()
                .next()
                .and_then(|choice| choice.message.content),
        )
    }
}

/// Secondary provider: bare text-inference endpoint (Hugging Face style).
/// The prompt travels under `inputs` and the reply is the first element's
/// `generated_text`.
pub struct TextInferenceProvider {
    client: reqwest::Client,
    endpoint_url: String,
    api_key: String,
}

impl TextInferenceProvider {
    pub fn new(
        client: reqwest::Client,
        endpoint_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        TextInferenceProvider {
            client,
            endpoint_url: endpoint_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl Provider for TextInferenceProvider {
    fn name(&self) -> &str {
        "text-inference"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let request = InferenceRequest {
            inputs: prompt.to_string(),
        };

        let response = self
            .client
            .post(&self.endpoint_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::Http)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status,
                detail: error_summary(&body),
            });
        }

        let payload: Vec<GeneratedText> = response
            .json()
            .await
            .map_err(|err| ProviderError::BadPayload(err.to_string()))?;

        extract_reply(
            payload
                .into_iter()
                .next()
                .and_then(|entry| entry.generated_text),
        )
    }
}

/// Pull a short human-readable summary out of an error body. Providers tend
/// to answer failures with JSON carrying a message at one of a few paths.
fn error_summary(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body.trim()).ok()?;
    let summary = value
        .pointer("/error/message")
        .and_then(|v| v.as_str())
        .or_else(|| value.get("error").and_then(|v| v.as_str()))
        .or_else(|| value.get("message").and_then(|v| v.as_str()))?;

    let collapsed = summary.split_whitespace().collect::<Vec<_>>().join(" ");
    (!collapsed.is_empty()).then_some(collapsed)
}

fn extract_reply(text: Option<String>) -> Result<String, ProviderError> {
    match text {
        Some(reply) if !reply.trim().is_empty() => Ok(reply),
        _ => Err(ProviderError::EmptyReply),
    }
}

/// Ordered fallback chain over providers. The order is the priority and is
/// fixed for the lifetime of the chain; every `respond` call restarts from
/// the first provider regardless of past failures.
pub struct ProviderChain {
    providers: Vec<Box<dyn Provider>>,
    timeout: Duration,
}

impl ProviderChain {
    pub fn new(providers: Vec<Box<dyn Provider>>, timeout: Duration) -> Self {
        ProviderChain { providers, timeout }
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Produce a reply for the prompt. Total at this boundary: the caller
    /// never sees an error, only a reply or the terminal fallback string.
    ///
    /// Attempts are strictly sequential; a later provider is contacted only
    /// after the earlier one has definitively failed, which bounds worst-case
    /// latency to the sum of per-provider timeouts.
    pub async fn respond(&self, prompt: &str) -> String {
        for provider in &self.providers {
            debug!(provider = provider.name(), "requesting reply");

            let attempt = match tokio::time::timeout(self.timeout, provider.generate(prompt)).await
            {
                Ok(result) => result,
                Err(_) => Err(ProviderError::Timeout(self.timeout)),
            };

            match attempt {
                Ok(reply) => {
                    debug!(provider = provider.name(), "reply accepted");
                    return reply;
                }
                Err(err) => {
                    warn!(
                        provider = provider.name(),
                        error = %err,
                        "provider failed, trying next"
                    );
                }
            }
        }

        warn!("all providers exhausted, returning fallback reply");
        FALLBACK_REPLY.to_string()
    }
}
