//! Provenance header carried by every survey document.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

pub const DEFAULT_VERSION: &str = "1.0";
pub const DEFAULT_LOCALE: &str = "ja-JP";

/// Document metadata. Not consulted by any business rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    pub version: String,
    pub locale: String,
    pub generated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_chain: Option<PromptChain>,
}

/// Link to the document a stage consumed when producing this one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptChain {
    pub previous: String,
    pub schema_version: String,
}

impl Meta {
    pub fn new() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            generated_at: Timestamp::now(),
            prompt_chain: None,
        }
    }

    /// Metadata for a document derived from a `previous` stage output.
    pub fn chained(previous: &str) -> Self {
        Self {
            prompt_chain: Some(PromptChain {
                previous: previous.to_string(),
                schema_version: DEFAULT_VERSION.to_string(),
            }),
            ..Self::new()
        }
    }
}

impl Default for Meta {
    fn default() -> Self {
        Self::new()
    }
}
