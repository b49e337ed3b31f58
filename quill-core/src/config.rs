//! Settings lookup for the generation pipeline.
//!
//! The host platform owns the real settings storage (a key/value system
//! parameter table); this module defines the read-only seam the pipeline
//! consumes, plus two implementations: an in-memory map for embedding hosts
//! and tests, and a flat TOML file for standalone deployments.
//!
//! Settings are re-read on every generation call, so updates take effect
//! without restarting anything.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{CoreError, Result};

/// Settings keys consumed by the generation pipeline.
pub mod keys {
    /// Override for the managed text-generation endpoint.
    pub const OLG_ENDPOINT: &str = "olg_api_endpoint";
    /// Tenant identifier for the managed service.
    pub const DATABASE_UUID: &str = "database_uuid";
    /// Route calls to the public inference backend instead of the managed one.
    pub const USE_INFERENCE_API: &str = "use_inference_api";
    /// Bearer token for the public inference backend.
    pub const INFERENCE_TOKEN: &str = "inference_api_token";
    /// Model identifier for the public inference backend.
    pub const INFERENCE_MODEL: &str = "inference_model";
    /// Base URL for the public inference backend.
    pub const INFERENCE_ENDPOINT: &str = "inference_api_endpoint";
}

/// Read-only key/value settings lookup.
///
/// Implementations return `None` for keys that are absent *or stored blank* —
/// hosts commonly persist `""` for fields the user never filled in.
pub trait SettingsStore: Send + Sync {
    /// Look up a setting by key.
    fn get(&self, key: &str) -> Option<String>;

    /// Look up a setting, falling back to `default` when unset.
    fn get_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    /// Read a boolean flag stored as text.
    ///
    /// Hosts persist flags as stringified booleans, so `"True"` and `"true"`
    /// both read as set; anything else (including absence) reads as unset.
    fn get_flag(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| v.eq_ignore_ascii_case("true"))
    }
}

/// In-memory settings store.
#[derive(Debug, Clone, Default)]
pub struct MemorySettings {
    values: HashMap<String, String>,
}

impl MemorySettings {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, builder-style.
    #[must_use]
    pub fn with(mut self, key: &str, value: &str) -> Self {
        self.set(key, value);
        self
    }

    /// Set a value in place.
    pub fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

impl SettingsStore for MemorySettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

/// Settings loaded from a flat TOML table.
///
/// Non-string values (booleans, numbers) are kept in their text rendering,
/// matching how the host's parameter table stores everything as text.
#[derive(Debug, Clone, Default)]
pub struct FileSettings {
    values: HashMap<String, String>,
}

impl FileSettings {
    /// Parse settings from a TOML string.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] if the TOML is invalid.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let table: toml::Table = toml_str
            .parse()
            .map_err(|e: toml::de::Error| CoreError::Config(e.to_string()))?;

        let mut values = HashMap::new();
        for (key, value) in table {
            let rendered = match value {
                toml::Value::String(s) => s,
                other => other.to_string(),
            };
            values.insert(key, rendered);
        }
        Ok(Self { values })
    }

    /// Load settings from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

impl SettingsStore for FileSettings {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).filter(|v| !v.is_empty()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_settings_roundtrip() {
        let settings = MemorySettings::new().with(keys::INFERENCE_MODEL, "my/model");
        assert_eq!(
            settings.get(keys::INFERENCE_MODEL),
            Some("my/model".to_string())
        );
        assert!(settings.get(keys::INFERENCE_TOKEN).is_none());
    }

    #[test]
    fn blank_values_read_as_unset() {
        let settings = MemorySettings::new().with(keys::INFERENCE_TOKEN, "");
        assert!(settings.get(keys::INFERENCE_TOKEN).is_none());
        assert_eq!(settings.get_or(keys::INFERENCE_TOKEN, "fallback"), "fallback");
    }

    #[test]
    fn flag_parsing_is_case_insensitive() {
        let settings = MemorySettings::new()
            .with("a", "True")
            .with("b", "true")
            .with("c", "False")
            .with("d", "yes");
        assert!(settings.get_flag("a"));
        assert!(settings.get_flag("b"));
        assert!(!settings.get_flag("c"));
        assert!(!settings.get_flag("d"));
        assert!(!settings.get_flag("missing"));
    }

    #[test]
    fn file_settings_parse_mixed_types() {
        let settings = FileSettings::from_toml(
            r#"
            use_inference_api = true
            inference_model = "google/flan-t5-large"
            "#,
        )
        .expect("valid toml");

        assert!(settings.get_flag(keys::USE_INFERENCE_API));
        assert_eq!(
            settings.get(keys::INFERENCE_MODEL),
            Some("google/flan-t5-large".to_string())
        );
    }

    #[test]
    fn file_settings_reject_invalid_toml() {
        assert!(FileSettings::from_toml("not = = toml").is_err());
    }

    #[test]
    fn file_settings_load_from_disk() {
        use std::io::Write as _;

        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "database_uuid = \"abc-123\"").expect("write");

        let settings = FileSettings::from_file(file.path()).expect("load");
        assert_eq!(
            settings.get(keys::DATABASE_UUID),
            Some("abc-123".to_string())
        );
    }
}
