//! Domain layer containing the survey-authoring logic.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (IDs, timestamps, errors, state machines)
//! - `survey` - The Requirements, QuestionSet and FollowUp documents
//! - `extraction` - Local heuristic requirement extraction
//! - `depth` - Follow-up planning and the one-question-at-a-time queue
//! - `generation` - Local question generation and its lookup tables
//! - `conversation` - The conversation aggregate, previews and hand-off

pub mod conversation;
pub mod depth;
pub mod extraction;
pub mod foundation;
pub mod generation;
pub mod survey;
