//! Requirement extraction from free text.
//!
//! The remote strategy lives behind the generation port; this module holds
//! the local heuristic strategy used when that fails or is unavailable.

mod heuristics;
pub mod vocabulary;

pub use heuristics::{detect_count_adjustment, sanitize, LocalExtraction, LocalExtractor, MAX_INPUT_CHARS};
