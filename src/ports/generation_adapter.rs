//! Generation Adapter Port - the swappable text-to-structure black box.
//!
//! The adapter may be a rule engine, a remote model, or a human in the loop.
//! Callers treat it as side-effect free and non-deterministic. Outputs are
//! returned as raw JSON and are untrusted until the schema layer accepts them.
//!
//! # Example
//!
//! ```ignore
//! let raw = adapter.extract_requirements("テーマ: NPS調査").await?;
//! let requirements = validator.requirements(&raw)?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::domain::survey::Requirements;
use crate::ports::DocumentShape;

/// Port for the three generation capabilities.
#[async_trait]
pub trait GenerationAdapter: Send + Sync {
    /// Free text to a Requirements-shaped document.
    async fn extract_requirements(&self, free_text: &str) -> Result<Value, GenerationFailure>;

    /// Requirements to a QuestionSet-shaped document.
    async fn generate_questions(&self, requirements: &Requirements)
        -> Result<Value, GenerationFailure>;

    /// Requirements to a FollowUp-shaped document.
    async fn generate_follow_ups(
        &self,
        requirements: &Requirements,
    ) -> Result<Value, GenerationFailure>;

    fn adapter_info(&self) -> AdapterInfo;
}

/// One adapter capability. Each pairs a request with exactly one document shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    ExtractRequirements,
    GenerateQuestions,
    GenerateFollowUps,
}

impl Capability {
    /// Shape of the response document.
    pub fn response_shape(&self) -> DocumentShape {
        match self {
            Capability::ExtractRequirements => DocumentShape::Requirements,
            Capability::GenerateQuestions => DocumentShape::QuestionSet,
            Capability::GenerateFollowUps => DocumentShape::FollowUp,
        }
    }

    /// Relative endpoint for network adapters.
    pub fn endpoint(&self) -> &'static str {
        match self {
            Capability::ExtractRequirements => "requirements",
            Capability::GenerateQuestions => "questions",
            Capability::GenerateFollowUps => "follow-ups",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::ExtractRequirements => "extract_requirements",
            Capability::GenerateQuestions => "generate_questions",
            Capability::GenerateFollowUps => "generate_follow_ups",
        };
        f.write_str(s)
    }
}

/// Identifies an adapter in logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterInfo {
    pub name: String,
    pub remote: bool,
}

impl AdapterInfo {
    pub fn new(name: impl Into<String>, remote: bool) -> Self {
        Self {
            name: name.into(),
            remote,
        }
    }
}

/// An adapter call failed. Always recoverable by a fallback path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationFailure {
    #[error("adapter unavailable: {message}")]
    Unavailable { message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("adapter returned HTTP {status}")]
    Http { status: u16 },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl GenerationFailure {
    pub fn unavailable(message: impl Into<String>) -> Self {
        GenerationFailure::Unavailable {
            message: message.into(),
        }
    }

    /// Failures worth a warning in the logs rather than a debug line.
    pub fn is_unexpected(&self) -> bool {
        !matches!(self, GenerationFailure::Unavailable { .. })
    }
}
