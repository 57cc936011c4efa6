//! In-memory draft store.
//!
//! Keeps hand-off drafts as serialized JSON, the way a browser session store
//! would. Useful for tests and the terminal client.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::HandoffDraft;
use crate::ports::{DraftStore, DraftStoreError};

#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Raw stored text, for inspecting the hand-off payload.
    pub async fn raw(&self, key: &str) -> Option<String> {
        self.entries.read().await.get(key).cloned()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn put(&self, key: &str, draft: &HandoffDraft) -> Result<(), DraftStoreError> {
        let json =
            serde_json::to_string(draft).map_err(|e| DraftStoreError::Serialization(e.to_string()))?;
        self.entries.write().await.insert(key.to_string(), json);
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<HandoffDraft>, DraftStoreError> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .map(|json| {
                serde_json::from_str(json).map_err(|e| DraftStoreError::Serialization(e.to_string()))
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::conversation::DraftQuestion;
    use crate::domain::survey::SurveyMode;
    use crate::ports::ASSISTANT_DRAFT_KEY;

    fn draft() -> HandoffDraft {
        HandoffDraft {
            title: "NPS調査".into(),
            survey_type: SurveyMode::Main,
            audience: Some("既存顧客".into()),
            questions: vec![DraftQuestion {
                id: "Q1".into(),
                text: "推奨度を教えてください".into(),
            }],
        }
    }

    #[tokio::test]
    async fn put_then_get_returns_the_draft() {
        let store = InMemoryDraftStore::new();
        store.put(ASSISTANT_DRAFT_KEY, &draft()).await.unwrap();
        assert_eq!(store.get(ASSISTANT_DRAFT_KEY).await.unwrap(), Some(draft()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn stored_payload_uses_type_key() {
        let store = InMemoryDraftStore::new();
        store.put("k", &draft()).await.unwrap();
        let raw = store.raw("k").await.unwrap();
        assert!(raw.contains("\"type\":\"main\""));
    }

    #[tokio::test]
    async fn missing_key_is_none() {
        assert_eq!(InMemoryDraftStore::new().get("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_payload_is_a_serialization_error() {
        let store = InMemoryDraftStore::new();
        store.entries.write().await.insert("k".into(), "{".into());
        assert!(matches!(
            store.get("k").await,
            Err(DraftStoreError::Serialization(_))
        ));
    }
}
