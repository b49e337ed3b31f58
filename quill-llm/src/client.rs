//! Text Client — unified interface over the managed and inference backends.

use std::time::Duration;

use reqwest::Client;
use serde_json::{Value, json};
use tracing::{debug, warn};

use quill_core::config::{SettingsStore, keys};

use crate::error::GenerateError;

/// Default endpoint for the managed text-generation service.
pub const DEFAULT_OLG_ENDPOINT: &str = "https://olg.api.quill.dev";

/// Default base URL for the public inference backend.
pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://api-inference.huggingface.co/models/";

/// Default model served by the public inference backend.
pub const DEFAULT_INFERENCE_MODEL: &str = "google/flan-t5-large";

/// Hard timeout for any outbound generation call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Which backend a generation call is routed to.
///
/// Resolved from the settings store at call time and never cached, so a
/// configuration change takes effect on the next call.
#[derive(Debug, Clone)]
pub enum Provider {
    /// Managed service gated by a tenant identifier.
    Managed {
        /// Service base URL.
        endpoint: String,
        /// Tenant identifier; `None` means the host is not provisioned.
        database_id: Option<String>,
    },
    /// Public inference API gated by a bearer token.
    Inference {
        /// Inference base URL; the model name is appended to it.
        endpoint: String,
        /// Model identifier.
        model: String,
        /// Bearer token; `None` means the user has not configured one.
        token: Option<String>,
    },
}

impl Provider {
    /// Resolve the active backend from the settings store.
    #[must_use]
    pub fn from_settings(settings: &dyn SettingsStore) -> Self {
        if settings.get_flag(keys::USE_INFERENCE_API) {
            Provider::Inference {
                endpoint: settings.get_or(keys::INFERENCE_ENDPOINT, DEFAULT_INFERENCE_ENDPOINT),
                model: settings.get_or(keys::INFERENCE_MODEL, DEFAULT_INFERENCE_MODEL),
                token: settings.get(keys::INFERENCE_TOKEN),
            }
        } else {
            Provider::Managed {
                endpoint: settings.get_or(keys::OLG_ENDPOINT, DEFAULT_OLG_ENDPOINT),
                database_id: settings.get(keys::DATABASE_UUID),
            }
        }
    }
}

/// HTTP client for text generation, routing on [`Provider`].
pub struct TextClient {
    http: Client,
}

impl TextClient {
    /// Create a new client.
    #[must_use]
    pub fn new() -> Self {
        Self {
            http: Client::new(),
        }
    }

    /// Send a prompt to the selected backend and return the generated text.
    ///
    /// Returns `Ok(None)` when the managed backend has no tenant identifier
    /// configured: that is configuration incompleteness the caller degrades
    /// on, not an error.
    pub async fn send(
        &self,
        provider: &Provider,
        prompt: &str,
        history: &[String],
    ) -> Result<Option<String>, GenerateError> {
        match provider {
            Provider::Managed {
                endpoint,
                database_id,
            } => {
                self.send_managed(endpoint, database_id.as_deref(), prompt, history)
                    .await
            }
            Provider::Inference {
                endpoint,
                model,
                token,
            } => self
                .send_inference(endpoint, model, token.as_deref(), prompt, history)
                .await
                .map(Some),
        }
    }

    async fn send_managed(
        &self,
        endpoint: &str,
        database_id: Option<&str>,
        prompt: &str,
        history: &[String],
    ) -> Result<Option<String>, GenerateError> {
        let Some(database_id) = database_id else {
            warn!("managed backend has no tenant identifier configured, skipping call");
            return Ok(None);
        };

        let url = format!("{endpoint}/api/olg/1/chat");
        let body = json!({
            "prompt": prompt,
            "conversation_history": history,
            "database_id": database_id,
        });

        debug!(%url, "sending prompt to managed backend");
        let response = self
            .http
            .post(&url)
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                GenerateError::Access(format!(
                    "check the service configuration, remaining credits, or service status ({e})"
                ))
            })?;

        let payload: Value = response
            .json()
            .await
            .map_err(|e| GenerateError::Internal(format!("undecodable managed response: {e}")))?;

        interpret_managed_response(&payload)
    }

    async fn send_inference(
        &self,
        endpoint: &str,
        model: &str,
        token: Option<&str>,
        prompt: &str,
        history: &[String],
    ) -> Result<String, GenerateError> {
        let Some(token) = token else {
            return Err(GenerateError::Config(format!(
                "no inference API token set, add one under the `{}` setting",
                keys::INFERENCE_TOKEN
            )));
        };

        let url = format!("{endpoint}{model}");
        let full_prompt = render_conversation(history, prompt);
        let body = json!({
            "inputs": full_prompt,
            "parameters": {
                "max_length": 500,
                "temperature": 0.7,
                "top_p": 0.9,
                "do_sample": true,
            },
        });

        debug!(%url, "sending prompt to inference backend");
        let response = self
            .http
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .json(&body)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| GenerateError::Service(format!("unreadable response body: {e}")))?;

        interpret_inference_response(status, &raw, &full_prompt)
    }
}

impl Default for TextClient {
    fn default() -> Self {
        Self::new()
    }
}

/// Interpret the managed backend's JSON envelope.
///
/// `status: "success"` yields the `content` field (which may be empty); the
/// two documented error statuses map to their taxonomy kinds; anything else
/// becomes a service error carrying the reported `error_message`.
pub fn interpret_managed_response(payload: &Value) -> Result<Option<String>, GenerateError> {
    let status = payload
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or_default();

    match status {
        "success" => Ok(Some(
            payload
                .get("content")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
        )),
        "error_prompt_too_long" => Err(GenerateError::PromptTooLong(
            "try to say it in fewer words".into(),
        )),
        "limit_call_reached" => Err(GenerateError::RateLimited(
            "you have reached the maximum number of requests for this service, try again later"
                .into(),
        )),
        other => {
            let message = payload
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or("Unknown error");
            warn!(status = other, detail = message, "managed backend reported an error");
            Err(GenerateError::Service(format!(
                "{message}, please try again later"
            )))
        }
    }
}

/// Interpret the public inference backend's response.
///
/// 200 responses never fail: unparseable JSON falls back to the raw body,
/// non-array JSON is stringified, and an echoed prompt prefix is stripped
/// from `generated_text`. Non-200 statuses map to the error taxonomy.
pub fn interpret_inference_response(
    status: u16,
    body: &str,
    full_prompt: &str,
) -> Result<String, GenerateError> {
    match status {
        200 => Ok(extract_generated_text(body, full_prompt)),
        401 => Err(GenerateError::Access("invalid or expired API token".into())),
        429 => Err(GenerateError::RateLimited(
            "request limit reached on the inference API, try again later".into(),
        )),
        503 => Err(GenerateError::Service(
            "the service is temporarily unavailable, try again later".into(),
        )),
        other => {
            let mut message = format!("inference API returned status {other}");
            if let Ok(payload) = serde_json::from_str::<Value>(body) {
                if let Some(detail) = payload.get("error").and_then(Value::as_str) {
                    message.push_str(" - ");
                    message.push_str(detail);
                }
            } else {
                let prefix: String = body.chars().take(100).collect();
                message.push_str(" - ");
                message.push_str(&prefix);
            }
            warn!(status = other, "inference backend reported an error");
            Err(GenerateError::Service(message))
        }
    }
}

fn extract_generated_text(body: &str, full_prompt: &str) -> String {
    let Ok(payload) = serde_json::from_str::<Value>(body) else {
        // A 200 with an unparseable body still counts as a response.
        return body.to_string();
    };

    match payload.as_array().and_then(|items| items.first()) {
        Some(first) => {
            let text = first
                .get("generated_text")
                .and_then(Value::as_str)
                .unwrap_or_default();
            // Some models echo the prompt back in front of the completion.
            match text.strip_prefix(full_prompt) {
                Some(rest) => rest.trim().to_string(),
                None => text.to_string(),
            }
        }
        None => payload.to_string(),
    }
}

/// Render conversation history plus the new prompt in the inference
/// backend's plain-text chat convention.
///
/// History lines alternate `User:` / `Assistant:` by position parity, the
/// new prompt follows as a `User:` line with a trailing `Assistant:` cue.
/// With no history the prompt is sent bare.
#[must_use]
pub fn render_conversation(history: &[String], prompt: &str) -> String {
    if history.is_empty() {
        return prompt.to_string();
    }

    let context = history
        .iter()
        .enumerate()
        .map(|(i, message)| {
            let speaker = if i % 2 == 0 { "User" } else { "Assistant" };
            format!("{speaker}: {message}")
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!("{context}\nUser: {prompt}\nAssistant:")
}
