//! Gemini `generateContent` client.
//!
//! One request per call: no retries, no streaming. The request is bounded by
//! the configured timeout and every failure is returned to the caller.

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode};
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use srsgen_shared::{GenerationConfig, Prompt, Result, SrsError};

/// Header carrying the service API key.
const API_KEY_HEADER: &str = "x-goog-api-key";

/// User-Agent string for generation requests.
const USER_AGENT: &str = concat!("srsgen/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// `{"contents":[{"parts":[{"text": ...}]}]}`
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a Prompt) -> Self {
        Self {
            contents: [Content {
                parts: [Part {
                    text: prompt.as_str(),
                }],
            }],
        }
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Client for the generative-text endpoint.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: Client,
    config: GenerationConfig,
}

impl GenerationClient {
    /// Build a client from the runtime generation config.
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.timeout)
            .build()
            .map_err(|e| SrsError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            config: config.clone(),
        })
    }

    /// Send the prompt and return the first candidate's text.
    #[instrument(skip_all, fields(endpoint = %self.config.endpoint, prompt_chars = prompt.as_str().len()))]
    pub async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let start = Instant::now();

        let response = self
            .http
            .post(self.config.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.config.api_key)
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .map_err(|e| send_error(e, self.config.timeout))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| SrsError::Transport {
            status: Some(status.as_u16()),
            body: format!("failed to read body: {e}"),
        })?;

        if status != StatusCode::OK {
            warn!(%status, body_len = body.len(), "generation request rejected");
            return Err(SrsError::Transport {
                status: Some(status.as_u16()),
                body,
            });
        }

        let json: Value = serde_json::from_str(&body)
            .map_err(|e| SrsError::ResponseShape(format!("body is not JSON: {e}")))?;

        log_usage(&json);
        let text = completion_text(&json)?;

        info!(
            chars = text.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "generation complete"
        );
        Ok(text)
    }
}

fn send_error(e: reqwest::Error, timeout: Duration) -> SrsError {
    let body = if e.is_timeout() {
        format!("request timed out after {timeout:?}")
    } else {
        e.to_string()
    };
    SrsError::Transport { status: None, body }
}

/// Navigate `candidates[0].content.parts[0].text`.
fn completion_text(json: &Value) -> Result<String> {
    let missing = |path: &str| SrsError::ResponseShape(format!("missing `{path}`"));

    let candidate = json
        .get("candidates")
        .ok_or_else(|| missing("candidates"))?
        .get(0)
        .ok_or_else(|| missing("candidates[0]"))?;

    let content = candidate.get("content").ok_or_else(|| {
        match candidate.get("finishReason").and_then(Value::as_str) {
            Some(reason) => SrsError::ResponseShape(format!(
                "missing `candidates[0].content` (finishReason: {reason})"
            )),
            None => missing("candidates[0].content"),
        }
    })?;

    content
        .get("parts")
        .ok_or_else(|| missing("candidates[0].content.parts"))?
        .get(0)
        .ok_or_else(|| missing("candidates[0].content.parts[0]"))?
        .get("text")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| missing("candidates[0].content.parts[0].text"))
}

fn log_usage(json: &Value) {
    if let Some(usage) = json.get("usageMetadata") {
        debug!(
            tokens_in = usage.get("promptTokenCount").and_then(|v| v.as_u64()),
            tokens_out = usage.get("candidatesTokenCount").and_then(|v| v.as_u64()),
            "token usage"
        );
    }
}
