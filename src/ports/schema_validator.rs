//! Schema Layer port - the only contract between pipeline stages.
//!
//! Every document an adapter returns is untrusted JSON until it passes
//! through a [`DocumentValidator`]. Validation normalizes (applies defaults)
//! and fails closed; it never coerces a wrong value into a right one.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::domain::survey::{FollowUp, QuestionSet, ReferentialIntegrityError, Requirements};

/// The three document shapes crossing stage boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentShape {
    Requirements,
    QuestionSet,
    FollowUp,
}

impl fmt::Display for DocumentShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DocumentShape::Requirements => "Requirements",
            DocumentShape::QuestionSet => "QuestionSet",
            DocumentShape::FollowUp => "FollowUp",
        };
        f.write_str(s)
    }
}

/// Port for validating and normalizing stage documents.
///
/// # Contract
///
/// - Returns the normalized document with defaults applied, or the first
///   violations found, each naming a dotted path.
/// - Never returns a document the typed model would reject.
pub trait DocumentValidator: Send + Sync {
    fn validate(&self, shape: DocumentShape, document: &Value) -> Result<Value, SchemaViolation>;

    fn requirements(&self, document: &Value) -> Result<Requirements, SchemaViolation> {
        typed(self.validate(DocumentShape::Requirements, document)?)
    }

    fn question_set(&self, document: &Value) -> Result<QuestionSet, SchemaViolation> {
        typed(self.validate(DocumentShape::QuestionSet, document)?)
    }

    fn follow_up(&self, document: &Value) -> Result<FollowUp, SchemaViolation> {
        typed(self.validate(DocumentShape::FollowUp, document)?)
    }
}

fn typed<T: DeserializeOwned>(normalized: Value) -> Result<T, SchemaViolation> {
    serde_json::from_value(normalized).map_err(|e| SchemaViolation::Invariant {
        path: "$".to_string(),
        reason: e.to_string(),
    })
}

/// A document failed validation at a stage boundary.
///
/// Variants carry the offending path. Use `to_client_message()` before
/// showing anything to an end user.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("Missing required field: {path}")]
    MissingRequired { path: String },

    #[error("Invalid type at {path}: expected {expected}, got {actual}")]
    InvalidType {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Invalid value at {path}: expected one of [{expected}], got {actual}")]
    InvalidEnum {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("Value out of range at {path}: {value} not in [{min}, {max}]")]
    OutOfRange {
        path: String,
        value: String,
        min: String,
        max: String,
    },

    #[error("Invalid format at {path}: expected {format}")]
    InvalidFormat { path: String, format: String },

    #[error("Inconsistent field at {path}: {reason}")]
    InconsistentField { path: String, reason: String },

    #[error("Duplicate value at {path}: {value}")]
    Duplicate { path: String, value: String },

    #[error("Invariant violated at {path}: {reason}")]
    Invariant { path: String, reason: String },

    #[error(transparent)]
    ReferentialIntegrity(#[from] ReferentialIntegrityError),

    #[error("Validation errors: {0:?}")]
    Multiple(Vec<SchemaViolation>),
}

impl SchemaViolation {
    /// Client-safe summary without document internals.
    pub fn to_client_message(&self) -> String {
        match self {
            SchemaViolation::MissingRequired { path } => format!("Missing required field: {}", path),
            SchemaViolation::InvalidType { path, expected, .. } => {
                format!("Invalid type for field '{}': expected {}", path, expected)
            }
            SchemaViolation::InvalidEnum { path, .. } => {
                format!("Field '{}' has an unsupported value", path)
            }
            SchemaViolation::OutOfRange { path, min, max, .. } => {
                format!("Field '{}' must be between {} and {}", path, min, max)
            }
            SchemaViolation::InvalidFormat { path, format } => {
                format!("Field '{}' must be a valid {}", path, format)
            }
            SchemaViolation::InconsistentField { path, .. } => {
                format!("Field '{}' is inconsistent", path)
            }
            SchemaViolation::Duplicate { path, .. } => format!("Field '{}' has duplicates", path),
            SchemaViolation::Invariant { reason, .. } => {
                let short: String = reason.chars().take(97).collect();
                if short.len() < reason.len() {
                    format!("Validation failed: {}...", short)
                } else {
                    format!("Validation failed: {}", reason)
                }
            }
            SchemaViolation::ReferentialIntegrity(_) => {
                "Branch rules refer to an unknown question".to_string()
            }
            SchemaViolation::Multiple(errors) => errors
                .first()
                .map(|e| e.to_client_message())
                .unwrap_or_else(|| "Validation failed".to_string()),
        }
    }

    pub fn error_count(&self) -> usize {
        match self {
            SchemaViolation::Multiple(errors) => errors.len(),
            _ => 1,
        }
    }

    /// Collapses a list into one violation; `None` when the list is empty.
    pub fn collect(mut errors: Vec<SchemaViolation>) -> Option<SchemaViolation> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(SchemaViolation::Multiple(errors)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_message_hides_actual_values() {
        let err = SchemaViolation::InvalidEnum {
            path: "required.title.source".into(),
            expected: "user, inferred, empty".into(),
            actual: "\"guess\"".into(),
        };
        let msg = err.to_client_message();
        assert!(msg.contains("required.title.source"));
        assert!(!msg.contains("guess"));
    }

    #[test]
    fn long_invariant_reason_is_truncated_on_char_boundary() {
        let err = SchemaViolation::Invariant {
            path: "$".into(),
            reason: "設".repeat(150),
        };
        let msg = err.to_client_message();
        assert!(msg.ends_with("..."));
    }

    #[test]
    fn collect_flattens_single_error() {
        let one = SchemaViolation::MissingRequired { path: "meta".into() };
        assert_eq!(SchemaViolation::collect(vec![one.clone()]), Some(one));
        assert_eq!(SchemaViolation::collect(vec![]), None);
    }

    #[test]
    fn multiple_reports_count_and_first_message() {
        let err = SchemaViolation::Multiple(vec![
            SchemaViolation::MissingRequired { path: "required.title".into() },
            SchemaViolation::MissingRequired { path: "required.purpose".into() },
        ]);
        assert_eq!(err.error_count(), 2);
        assert_eq!(err.to_client_message(), "Missing required field: required.title");
    }

    #[test]
    fn referential_error_converts() {
        let err: SchemaViolation = ReferentialIntegrityError {
            rule_index: 2,
            field: "else",
            target: "Q7".into(),
        }
        .into();
        assert!(err.to_string().contains("branchRules[2].else"));
    }
}
