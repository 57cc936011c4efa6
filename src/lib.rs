//! Survey Assistant - conversational survey authoring.
//!
//! Turns a free-text brief into a validated survey draft: extract a
//! Requirements document, ask follow-up questions for whatever is still
//! missing, generate screening and main questions, and hand off the
//! confirmed draft.
//!
//! Every document produced by the pluggable generation adapter passes the
//! schema layer before it is read, and each stage falls back to local
//! heuristics when the adapter fails.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
