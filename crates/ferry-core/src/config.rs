//! CodecConfig - settings for the closure codec.
//!
//! Read from JSON (every field optional) and optionally overridden from the
//! environment:
//! - `FERRY_ERROR_POLICY`: `strict` | `lenient`

use serde::{Deserialize, Serialize};

use crate::codec::{ErrorPolicy, UnknownPolicy};

pub const ERROR_POLICY_ENV: &str = "FERRY_ERROR_POLICY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub error_policy: ErrorPolicy,

    /// Maximum number of lenient-mode diagnostics kept in memory.
    pub diagnostics_capacity: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid config json")]
    Json(#[from] serde_json::Error),

    #[error("invalid FERRY_ERROR_POLICY")]
    Policy(#[from] UnknownPolicy),
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            error_policy: ErrorPolicy::Strict,
            diagnostics_capacity: 256,
        }
    }
}

impl CodecConfig {
    pub fn strict() -> Self {
        Self::default()
    }

    pub fn lenient() -> Self {
        Self {
            error_policy: ErrorPolicy::Lenient,
            ..Self::default()
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Applies environment overrides; `lookup` is `std::env::var` in
    /// production and a map in tests.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup(ERROR_POLICY_ENV) {
            self.error_policy = raw.parse()?;
        }
        Ok(self)
    }

    pub fn from_env(self) -> Result<Self, ConfigError> {
        self.with_env_overrides(|key| std::env::var(key).ok())
    }
}
