//! Foundation module - shared domain primitives.

mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use errors::ValidationError;
pub use ids::{ConversationId, EntryId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
