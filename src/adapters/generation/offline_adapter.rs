//! Adapter for running without any generation backend.
//!
//! Every call fails with `Unavailable`, so the pipeline always takes the
//! local heuristic path.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::survey::Requirements;
use crate::ports::{AdapterInfo, GenerationAdapter, GenerationFailure};

#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineGenerationAdapter;

impl OfflineGenerationAdapter {
    pub fn new() -> Self {
        Self
    }

    fn refuse<T>() -> Result<T, GenerationFailure> {
        Err(GenerationFailure::unavailable("no generation backend configured"))
    }
}

#[async_trait]
impl GenerationAdapter for OfflineGenerationAdapter {
    async fn extract_requirements(&self, _free_text: &str) -> Result<Value, GenerationFailure> {
        Self::refuse()
    }

    async fn generate_questions(&self, _requirements: &Requirements) -> Result<Value, GenerationFailure> {
        Self::refuse()
    }

    async fn generate_follow_ups(&self, _requirements: &Requirements) -> Result<Value, GenerationFailure> {
        Self::refuse()
    }

    fn adapter_info(&self) -> AdapterInfo {
        AdapterInfo::new("offline", false)
    }
}
