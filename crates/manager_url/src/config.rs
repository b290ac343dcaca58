//! Tunables for URL sync, with defaults matching the manager's stock behavior.

use serde::{Deserialize, Serialize};

use crate::error::UrlSyncError;

/// View mode whose items carry argument state.
pub const DEFAULT_DETAIL_VIEW_MODE: &str = "story";
/// Route opened on launch when release notes are pending.
pub const DEFAULT_RELEASE_NOTES_PATH: &str = "/settings/release-notes";
/// Upper bound on idle-callback waits for debounced args writes.
pub const DEFAULT_IDLE_TIMEOUT_MS: u32 = 1000;
/// Timer delay for debounced args writes when idle callbacks are unavailable.
pub const DEFAULT_FALLBACK_DELAY_MS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
/// URL sync configuration. Missing fields take their defaults.
pub struct UrlSyncConfig {
    /// View mode in which `args` are mirrored into the URL.
    pub detail_view_mode: String,
    /// Route navigated to on launch when release notes are pending.
    pub release_notes_path: String,
    /// Idle-callback timeout for the debounced args writer.
    pub idle_timeout_ms: u32,
    /// Timer fallback delay for the debounced args writer.
    pub fallback_delay_ms: u32,
}

impl Default for UrlSyncConfig {
    fn default() -> Self {
        Self {
            detail_view_mode: DEFAULT_DETAIL_VIEW_MODE.to_string(),
            release_notes_path: DEFAULT_RELEASE_NOTES_PATH.to_string(),
            idle_timeout_ms: DEFAULT_IDLE_TIMEOUT_MS,
            fallback_delay_ms: DEFAULT_FALLBACK_DELAY_MS,
        }
    }
}

impl UrlSyncConfig {
    /// Parses a JSON override document and validates the result.
    ///
    /// # Errors
    ///
    /// Returns [`UrlSyncError::Config`] when the JSON is malformed or a value is unusable.
    pub fn from_json_str(raw: &str) -> Result<Self, UrlSyncError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| UrlSyncError::Config(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that routes are absolute and the view mode is named.
    ///
    /// # Errors
    ///
    /// Returns [`UrlSyncError::Config`] describing the first offending field.
    pub fn validate(&self) -> Result<(), UrlSyncError> {
        if self.detail_view_mode.trim().is_empty() {
            return Err(UrlSyncError::Config(
                "detail_view_mode must not be empty".to_string(),
            ));
        }
        if !self.release_notes_path.starts_with('/') {
            return Err(UrlSyncError::Config(format!(
                "release_notes_path `{}` must start with `/`",
                self.release_notes_path
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn partial_overrides_keep_defaults() {
        let config = UrlSyncConfig::from_json_str(r#"{"idle_timeout_ms": 250}"#).expect("config");
        assert_eq!(config.idle_timeout_ms, 250);
        assert_eq!(config.fallback_delay_ms, DEFAULT_FALLBACK_DELAY_MS);
        assert_eq!(config.release_notes_path, DEFAULT_RELEASE_NOTES_PATH);
    }

    #[test]
    fn rejects_relative_release_notes_path() {
        let err = UrlSyncConfig::from_json_str(r#"{"release_notes_path": "settings"}"#)
            .expect_err("relative path");
        assert!(matches!(err, UrlSyncError::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(UrlSyncConfig::from_json_str("{").is_err());
    }
}
