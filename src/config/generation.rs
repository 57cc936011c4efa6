//! Generation backend configuration

use secrecy::Secret;
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Which generation adapter the assistant talks to
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdapterKind {
    /// Canned in-process responses
    Mock,
    /// Remote service over HTTP
    Http,
    /// No backend; every stage uses its local fallback
    #[default]
    Offline,
}

/// Generation backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default)]
    pub adapter: AdapterKind,

    /// Base URL of the HTTP backend
    pub base_url: Option<String>,

    /// Bearer token for the HTTP backend
    pub api_key: Option<Secret<String>>,

    /// Per-call timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl GenerationConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=300).contains(&self.timeout_secs) {
            return Err(ValidationError::InvalidTimeout);
        }

        if self.adapter == AdapterKind::Http {
            let url = self
                .base_url
                .as_deref()
                .filter(|u| !u.trim().is_empty())
                .ok_or(ValidationError::MissingRequired("GENERATION__BASE_URL"))?;
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ValidationError::InvalidBaseUrl);
            }
        }

        Ok(())
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            adapter: AdapterKind::default(),
            base_url: None,
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}
