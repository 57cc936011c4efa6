//! Local question generation.
//!
//! Seeds a mode-specific base list, pads it with supplementary patterns to
//! the target count and attaches a rationale to each question.

mod generator;
pub mod tables;

pub use generator::{extend_to_count, Preferences, QuestionGenerator, OTHER_CHOICE_LABEL};
pub use tables::{display_category, rationale_for, DEFAULT_TITLE};
