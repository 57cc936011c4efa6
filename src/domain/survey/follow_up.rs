//! The FollowUp document: the missing-field interrogation plan.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::field::Priority;
use super::field_path::FieldPath;
use super::meta::Meta;

/// Answer shape the follow-up expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpectedFormat {
    #[default]
    Text,
    Enum,
    Multi,
    Number,
    Scale,
}

impl ExpectedFormat {
    pub const NAMES: [&'static str; 5] = ["text", "enum", "multi", "number", "scale"];
}

/// Answer constraints. Unknown keys are carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnswerValidation {
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUpQuestion {
    pub id: String,
    pub target_field: String,
    pub path: FieldPath,
    pub question_text: String,
    #[serde(default)]
    pub expected_format: ExpectedFormat,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<AnswerValidation>,
    #[serde(default)]
    pub example_answers: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub depends_on: Vec<String>,
}

impl FollowUpQuestion {
    /// Quick-pick candidates: explicit options, else example answers.
    pub fn candidates(&self) -> &[String] {
        if self.options.is_empty() {
            &self.example_answers
        } else {
            &self.options
        }
    }
}

/// What the orchestrator does once the queue drains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NextAction {
    Confirm,
    Regenerate,
    Proceed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowUp {
    pub meta: Meta,
    #[serde(default)]
    pub missing_fields: Vec<String>,
    #[serde(default)]
    pub additional_questions: Vec<FollowUpQuestion>,
    #[serde(default)]
    pub field_mapping: BTreeMap<String, String>,
    /// Entries of `missing_fields` intentionally left without a question.
    #[serde(default)]
    pub deferred_fields: Vec<String>,
    pub next_action: NextAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
}

impl FollowUp {
    pub fn has_questions(&self) -> bool {
        !self.additional_questions.is_empty()
    }

    pub fn question_for(&self, path: &FieldPath) -> Option<&FollowUpQuestion> {
        self.additional_questions.iter().find(|q| &q.path == path)
    }
}
