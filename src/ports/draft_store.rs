//! Draft Store Port - hand-off persistence.
//!
//! An opaque key-value put/get used to pass the confirmed draft to the
//! downstream survey editor.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::conversation::HandoffDraft;

/// Key under which the assistant stores its confirmed draft.
pub const ASSISTANT_DRAFT_KEY: &str = "assistant_draft";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftStoreError {
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn put(&self, key: &str, draft: &HandoffDraft) -> Result<(), DraftStoreError>;

    async fn get(&self, key: &str) -> Result<Option<HandoffDraft>, DraftStoreError>;
}
