use crate::log_debug;
use futures::{Stream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::time::Duration;
use thiserror::Error;

/// System role instruction sent with every completion request
pub const SYSTEM_PROMPT: &str =
    "You are a senior software engineer and technical documentation specialist.";

const TEMPERATURE: f32 = 0.5;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors surfaced while talking to the completion API
#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("completion API returned HTTP {status}: {message}")]
    Api { status: u16, message: String },

    #[error("network error contacting completion API: {0}")]
    Network(#[from] reqwest::Error),

    #[error("completion API response could not be decoded: {0}")]
    Decode(String),

    #[error("completion API response contained no content")]
    EmptyResponse,
}

/// Token accounting attached to a non-streamed completion, when the API
/// provides it
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// A complete (non-streamed) response body
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub usage: Option<Usage>,
}

/// A lazy, finite, non-restartable sequence of response text fragments
pub type SummaryStream = Pin<Box<dyn Stream<Item = Result<String, CompletionError>> + Send>>;

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    stream: bool,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Deserialize)]
struct Choice {
    message: AssistantMessage,
}

#[derive(Deserialize)]
struct AssistantMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct StreamChunk {
    choices: Vec<StreamChoice>,
}

#[derive(Deserialize)]
struct StreamChoice {
    delta: Delta,
}

#[derive(Deserialize, Default)]
struct Delta {
    #[serde(default)]
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completion API.
///
/// The synchronous and streamed calls are distinct operations sharing one
/// request-construction path; call sites pick the contract they need.
pub struct CompletionClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl CompletionClient {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self, CompletionError> {
        // No overall request timeout: it would cut off long-running streams.
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Issue one completion request and return the full response body.
    ///
    /// Token usage is attached when the API reports it; the caller decides
    /// how to surface the accounting.
    pub async fn complete(&self, user_prompt: &str) -> Result<Completion, CompletionError> {
        let response = self.send(user_prompt, false).await?;
        let body = response.text().await?;
        let parsed: ChatResponse =
            serde_json::from_str(&body).map_err(|e| CompletionError::Decode(e.to_string()))?;

        match &parsed.usage {
            Some(usage) => log_debug!(
                "Completion usage: prompt={} completion={} total={}",
                usage.prompt_tokens,
                usage.completion_tokens,
                usage.total_tokens
            ),
            None => log_debug!("Completion response carried no usage accounting"),
        }

        let text = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::EmptyResponse)?;

        Ok(Completion {
            text,
            usage: parsed.usage,
        })
    }

    /// Issue one completion request and return the response as an
    /// incremental fragment stream, decoded from server-sent events.
    pub async fn complete_stream(
        &self,
        user_prompt: &str,
    ) -> Result<SummaryStream, CompletionError> {
        let response = self.send(user_prompt, true).await?;

        let fragments = response
            .bytes_stream()
            .map_err(CompletionError::Network)
            .scan(String::new(), |buffer, frame| {
                let out: Vec<Result<String, CompletionError>> = match frame {
                    Ok(bytes) => {
                        buffer.push_str(&String::from_utf8_lossy(&bytes));
                        drain_fragments(buffer)
                    }
                    Err(e) => vec![Err(e)],
                };
                futures::future::ready(Some(futures::stream::iter(out)))
            })
            .flatten();

        Ok(Box::pin(fragments))
    }

    /// Shared request construction for both call modes
    async fn send(
        &self,
        user_prompt: &str,
        stream: bool,
    ) -> Result<reqwest::Response, CompletionError> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: TEMPERATURE,
            stream,
        };

        log_debug!(
            "Sending {} completion request to {} (model: {}, prompt: {} chars)",
            if stream { "streamed" } else { "buffered" },
            url,
            self.model,
            user_prompt.len()
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CompletionError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response)
    }
}

/// Pull every complete line out of `buffer` and decode the `data:` payloads
fn drain_fragments(buffer: &mut String) -> Vec<Result<String, CompletionError>> {
    let mut fragments = Vec::new();
    while let Some(newline) = buffer.find('\n') {
        let line = buffer[..newline].trim_end_matches('\r').to_string();
        buffer.drain(..=newline);
        if let Some(fragment) = parse_sse_data(&line) {
            fragments.push(fragment);
        }
    }
    fragments
}

/// Decode one server-sent-event line.
///
/// Returns `None` for non-data lines, the `[DONE]` sentinel, and empty
/// deltas; `Some(Err(_))` when a data payload is not valid JSON.
fn parse_sse_data(line: &str) -> Option<Result<String, CompletionError>> {
    let data = line.strip_prefix("data:")?.trim_start();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<StreamChunk>(data) {
        Ok(chunk) => chunk
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
            .map(Ok),
        Err(e) => Some(Err(CompletionError::Decode(e.to_string()))),
    }
}
