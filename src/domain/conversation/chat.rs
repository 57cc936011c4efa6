//! Chat log entries.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EntryId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// File reference sent alongside a message. Only its metadata is kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub name: String,
    pub media_type: String,
}

impl Attachment {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatEntry {
    pub id: EntryId,
    pub role: ChatRole,
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    pub created_at: Timestamp,
}

impl ChatEntry {
    pub fn user(text: impl Into<String>, attachments: Vec<Attachment>) -> Self {
        Self::new(ChatRole::User, text.into(), attachments)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, text.into(), Vec::new())
    }

    fn new(role: ChatRole, text: String, attachments: Vec<Attachment>) -> Self {
        Self {
            id: EntryId::new(),
            role,
            text,
            attachments,
            created_at: Timestamp::now(),
        }
    }
}
