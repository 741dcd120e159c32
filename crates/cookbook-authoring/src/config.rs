//! Authoring session configuration.

use std::path::Path;

use cookbook_core::{CookbookError, Result};
use serde::{Deserialize, Serialize};

/// What to do when a publish is requested while another is unresolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PublishPolicy {
    /// Refuse the new attempt with `PublishInFlight`.
    #[default]
    RejectWhilePending,
    /// Let attempts overlap; the status shows whichever resolves last.
    AllowOverlap,
}

/// Configuration for an authoring session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoringConfig {
    /// Handling of overlapping publish attempts.
    pub publish_policy: PublishPolicy,

    /// Status message shown after a successful publish.
    pub success_message: String,

    /// Prefix for the status message shown after a remote failure.
    pub failure_prefix: String,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            publish_policy: PublishPolicy::RejectWhilePending,
            success_message: "Recipe published successfully".to_string(),
            failure_prefix: "Failed to publish recipe".to_string(),
        }
    }
}

impl AuthoringConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CookbookError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Status message for a remote failure with the given detail.
    pub fn failure_message(&self, detail: &str) -> String {
        format!("{}: {}", self.failure_prefix, detail)
    }
}
