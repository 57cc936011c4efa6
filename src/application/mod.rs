//! Application layer - the orchestrator and its stage boundary.
//!
//! - `GenerationPipeline` runs each stage against the adapter, with timeout,
//!   validation and local fallback
//! - `AssistantService` drives one conversation from the UI's inbound calls

mod assistant_service;
mod pipeline;

pub use assistant_service::{apply_count_adjustment, AssistantError, AssistantService};
pub use pipeline::{Extraction, GenerationPipeline, StageFailure, Strategy, DEFAULT_STAGE_TIMEOUT};
