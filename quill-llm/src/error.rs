//! Generation error taxonomy.

use thiserror::Error;

/// Errors surfaced by the generation pipeline.
///
/// Every variant except [`GenerateError::Internal`] is user-facing: the
/// message is suitable for direct display, and the kind tells the caller
/// whether to fix configuration, check connectivity, wait, or shorten the
/// input. `Internal` never escapes the facade — `generate_text` logs it and
/// reports an empty generation instead.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Missing credentials or settings; not retryable until config is fixed.
    #[error("AI backend not configured: {0}")]
    Config(String),

    /// Transport or auth failure reaching the remote service.
    #[error("AI service unreachable: {0}")]
    Access(String),

    /// The remote service signaled its rate or quota limit.
    #[error("Rate limit reached: {0}")]
    RateLimited(String),

    /// The remote service rejected the input size.
    #[error("Prompt too long: {0}")]
    PromptTooLong(String),

    /// The remote service reported a failure, with detail where available.
    #[error("Generation failed: {0}")]
    Service(String),

    /// Unexpected local failure; swallowed at the facade boundary.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<reqwest::Error> for GenerateError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerateError::Access("the request timed out, try again later".into())
        } else if err.is_connect() {
            GenerateError::Access(format!(
                "could not connect to the service, check your connection ({err})"
            ))
        } else {
            GenerateError::Service(format!("unexpected request failure: {err}"))
        }
    }
}
