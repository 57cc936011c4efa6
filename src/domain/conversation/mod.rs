//! Conversation Orchestrator state.
//!
//! [`SurveyConversation`] is the single owner of per-conversation state; the
//! UI reads it through [`ConversationView`].

mod chat;
#[allow(clippy::module_inception)]
mod conversation;
mod phase;
mod preview;
pub mod replies;
mod suggestions;

pub use chat::{Attachment, ChatEntry, ChatRole};
pub use conversation::{
    ConversationError, ConversationView, IntentResolution, ProceedOffer, SurveyConversation,
    TurnOutcome, TurnTicket,
};
pub use phase::AssistantPhase;
pub use preview::{
    DraftQuestion, HandoffDraft, PreviewDocument, PreviewOrigin, PreviewQuestion,
    EMPTY_STATE_MESSAGE, UNSET_AUDIENCE,
};
pub use suggestions::CustomizationIntent;
