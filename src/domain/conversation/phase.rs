//! Phases of an assistant conversation.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Where a conversation stands.
///
/// The common path is `Idle → Extracting → FollowingUp → Proposing →
/// Previewing → Confirmed`; a complete brief skips straight from
/// `Extracting` to `Previewing`. Picking a template or past survey jumps to
/// `Previewing` from any non-terminal phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssistantPhase {
    /// Waiting for the first (or next) free-text brief.
    #[default]
    Idle,
    /// A new-intent turn is running extraction and planning.
    Extracting,
    /// Follow-up questions are being asked one at a time.
    FollowingUp,
    /// The queue drained; waiting for proceed or keep refining.
    Proposing,
    Previewing,
    /// The user asked to customize the preview.
    EditRequested,
    /// The preview was handed off. Terminal.
    Confirmed,
}

impl AssistantPhase {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Extracting => "extracting",
            Self::FollowingUp => "following_up",
            Self::Proposing => "proposing",
            Self::Previewing => "previewing",
            Self::EditRequested => "edit_requested",
            Self::Confirmed => "confirmed",
        }
    }

    /// True when a chat message starts a new extraction turn.
    pub fn accepts_new_intent(&self) -> bool {
        matches!(
            self,
            Self::Idle | Self::Extracting | Self::Proposing | Self::Previewing | Self::EditRequested
        )
    }
}

impl StateMachine for AssistantPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use AssistantPhase::*;
        match self {
            Idle => vec![Extracting, Previewing],
            Extracting => vec![Extracting, FollowingUp, Previewing, Idle],
            FollowingUp => vec![Proposing, Previewing],
            Proposing => vec![Previewing, Extracting, Idle],
            Previewing => vec![Previewing, Confirmed, EditRequested, Extracting],
            EditRequested => vec![Extracting, Previewing],
            Confirmed => vec![],
        }
    }
}
