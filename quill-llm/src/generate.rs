//! Generation facade — the single entry point hosts call.
//!
//! [`Generator::generate_text`] wraps one backend call with everything
//! around it: the empty-prompt short-circuit, duplicate suppression for
//! record-driven automation, the HTML-output prompt suffix, typed error
//! translation, and response formatting.

use std::sync::Arc;

use tracing::{debug, error, warn};

use quill_core::config::SettingsStore;
use quill_core::dedup::{DedupStats, ProcessedSet};
use quill_core::format::{Markup, format_response};

use crate::client::{Provider, TextClient};
use crate::error::GenerateError;

/// Instruction appended to every prompt so backends answer in HTML.
const HTML_OUTPUT_INSTRUCTION: &str = "\n **Remember to send the response in HTML format!**";

/// The business record a generation call runs for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    /// Record type identifier (the host's model name).
    pub model: String,
    /// Record instance identifier.
    pub id: i64,
}

impl RecordRef {
    /// Create a record reference.
    #[must_use]
    pub fn new(model: impl Into<String>, id: i64) -> Self {
        Self {
            model: model.into(),
            id,
        }
    }

    /// Dedup key for this record.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}:{}", self.model, self.id)
    }
}

/// Outcome of a generation call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generation {
    /// Formatted markup ready for display.
    Generated(Markup),
    /// Nothing was generated: empty prompt, incomplete configuration on the
    /// degradable path, an empty backend response, or a swallowed internal
    /// failure. Distinct from an error.
    Empty,
    /// The record was already handled in this process lifetime; no backend
    /// call was made.
    Skipped,
}

/// Orchestrates a single generation call: dedup guard, backend invocation,
/// error translation, and response formatting.
pub struct Generator {
    settings: Arc<dyn SettingsStore>,
    client: TextClient,
    processed: ProcessedSet,
}

impl Generator {
    /// Create a generator reading backend configuration from `settings`.
    #[must_use]
    pub fn new(settings: Arc<dyn SettingsStore>) -> Self {
        Self {
            settings,
            client: TextClient::new(),
            processed: ProcessedSet::default(),
        }
    }

    /// Use a caller-owned dedup set, shared across generators.
    #[must_use]
    pub fn with_processed_set(mut self, processed: ProcessedSet) -> Self {
        self.processed = processed;
        self
    }

    /// Generate formatted AI text for `prompt`.
    ///
    /// `history` carries prior conversation messages and may be empty.
    /// `record` identifies the business record the call runs for; when
    /// present, repeat calls for the same record are skipped (best-effort,
    /// see [`ProcessedSet`]).
    ///
    /// Errors in the user-facing taxonomy propagate unchanged. Unexpected
    /// internal failures are logged in full and reported as
    /// [`Generation::Empty`] so callers never see them raw.
    pub async fn generate_text(
        &self,
        prompt: &str,
        history: &[String],
        record: Option<&RecordRef>,
    ) -> Result<Generation, GenerateError> {
        if prompt.is_empty() {
            warn!("generate_text called with an empty prompt");
            return Ok(Generation::Empty);
        }

        if let Some(record) = record {
            let key = record.key();
            if self.processed.admit(&key) {
                debug!(%key, "processing record");
            } else {
                warn!(%key, "skipping already processed record");
                return Ok(Generation::Skipped);
            }
        }

        let augmented = format!("{prompt}{HTML_OUTPUT_INSTRUCTION}");
        let provider = Provider::from_settings(self.settings.as_ref());

        match self.client.send(&provider, &augmented, history).await {
            Ok(Some(raw)) if !raw.is_empty() => {
                debug!("raw response received, applying formatting");
                Ok(Generation::Generated(format_response(&raw)))
            }
            Ok(_) => {
                warn!("no response generated");
                Ok(Generation::Empty)
            }
            Err(GenerateError::Internal(detail)) => {
                error!(%detail, "unexpected failure during generation");
                Ok(Generation::Empty)
            }
            Err(err) => Err(err),
        }
    }

    /// Counters from the duplicate-suppression guard.
    #[must_use]
    pub fn dedup_stats(&self) -> DedupStats {
        self.processed.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_key_joins_model_and_id() {
        let record = RecordRef::new("crm.lead", 42);
        assert_eq!(record.key(), "crm.lead:42");
    }

    #[test]
    fn outcomes_are_distinguishable() {
        assert_ne!(Generation::Empty, Generation::Skipped);
        assert_ne!(
            Generation::Generated(format_response("x")),
            Generation::Empty
        );
    }
}
