//! Validation adapters - the schema layer implementation.

mod document_validator;

pub use document_validator::JsonDocumentValidator;
