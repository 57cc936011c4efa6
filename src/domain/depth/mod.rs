//! Follow-Up (Depth) Engine.
//!
//! [`DepthEngine`] plans which missing fields to ask about; [`FollowUpQueue`]
//! runs the plan as a state machine, one outstanding question at a time.

mod engine;
mod prompts;
mod queue;

use thiserror::Error;

use crate::domain::foundation::ValidationError;

pub use engine::DepthEngine;
pub use prompts::{built_in_question, BUILT_IN_ID_PREFIX};
pub use queue::{DepthState, FollowUpQueue};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DepthError {
    #[error("no follow-up question is awaiting an answer (state {state:?})")]
    NotAnswering { state: DepthState },

    #[error("a follow-up question is already awaiting an answer")]
    AlreadyAnswering,

    #[error("follow-up queue is empty")]
    NothingQueued,

    #[error("answer must not be blank")]
    BlankAnswer,

    #[error(transparent)]
    Transition(#[from] ValidationError),
}
