//! The Requirements document: a structured survey brief.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::field::{FieldValue, Priority};
use super::field_path::{FieldPath, FieldPathError, OptionalField, RequiredField};
use super::meta::Meta;
use super::mode::{clamp_question_count, SurveyMode};

/// The four mandatory fields. Every key is always present.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredFields {
    pub title: FieldValue,
    pub purpose: FieldValue,
    pub target_audience: FieldValue,
    pub analysis_audience: FieldValue,
}

impl RequiredFields {
    pub fn get(&self, field: RequiredField) -> &FieldValue {
        match field {
            RequiredField::Title => &self.title,
            RequiredField::Purpose => &self.purpose,
            RequiredField::TargetAudience => &self.target_audience,
            RequiredField::AnalysisAudience => &self.analysis_audience,
        }
    }

    pub fn get_mut(&mut self, field: RequiredField) -> &mut FieldValue {
        match field {
            RequiredField::Title => &mut self.title,
            RequiredField::Purpose => &mut self.purpose,
            RequiredField::TargetAudience => &mut self.target_audience,
            RequiredField::AnalysisAudience => &mut self.analysis_audience,
        }
    }
}

/// Declared handling of empty versus inferable fields. Documentation only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionPolicy {
    pub when_empty: String,
    pub when_inferable: String,
    #[serde(default)]
    pub notes: Vec<String>,
}

/// A follow-up the extractor itself proposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmationQuestion {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_field: Option<String>,
    pub question_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rationale: Option<String>,
    #[serde(default)]
    pub example_answers: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirements {
    pub meta: Meta,
    pub required: RequiredFields,
    #[serde(default)]
    pub optional: BTreeMap<String, FieldValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completion_policy: Option<CompletionPolicy>,
    #[serde(default)]
    pub confirmation_questions: Vec<ConfirmationQuestion>,
}

impl Requirements {
    /// A brief with every field unknown.
    pub fn empty() -> Self {
        Self {
            meta: Meta::new(),
            required: RequiredFields::default(),
            optional: BTreeMap::new(),
            completion_policy: None,
            confirmation_questions: Vec::new(),
        }
    }

    pub fn field(&self, path: &FieldPath) -> Option<&FieldValue> {
        match path {
            FieldPath::Required(f) => Some(self.required.get(*f)),
            FieldPath::Optional(key) => self.optional.get(key),
        }
    }

    /// Path-addressed write used by follow-up answers.
    pub fn set_at(&mut self, path: &FieldPath, value: FieldValue) {
        match path {
            FieldPath::Required(f) => *self.required.get_mut(*f) = value,
            FieldPath::Optional(key) => {
                self.optional.insert(key.clone(), value);
            }
        }
    }

    /// Same as [`set_at`](Self::set_at) for a textual path.
    pub fn set_at_str(&mut self, path: &str, value: FieldValue) -> Result<(), FieldPathError> {
        let path: FieldPath = path.parse()?;
        self.set_at(&path, value);
        Ok(())
    }

    pub fn optional_field(&self, field: OptionalField) -> Option<&FieldValue> {
        self.optional.get(field.key())
    }

    pub fn set_optional(&mut self, field: OptionalField, value: FieldValue) {
        self.optional.insert(field.key().to_string(), value);
    }

    /// Per-field rightmost-non-empty-wins merge.
    ///
    /// Non-empty fields of `newer` replace ours; empty ones keep ours. Lists of
    /// confirmation questions follow the same rule as a whole.
    pub fn merge(&self, newer: &Requirements) -> Requirements {
        let mut merged = self.clone();
        merged.meta = newer.meta.clone();
        for field in RequiredField::ALL {
            let incoming = newer.required.get(field);
            if !incoming.is_empty() {
                *merged.required.get_mut(field) = incoming.clone();
            }
        }
        for (key, incoming) in &newer.optional {
            let keep_prior = incoming.is_empty() && merged.optional.contains_key(key);
            if !keep_prior {
                merged.optional.insert(key.clone(), incoming.clone());
            }
        }
        if newer.completion_policy.is_some() {
            merged.completion_policy = newer.completion_policy.clone();
        }
        if !newer.confirmation_questions.is_empty() {
            merged.confirmation_questions = newer.confirmation_questions.clone();
        }
        merged
    }

    /// Required fields still unknown, in declaration order.
    pub fn missing_required(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|f| self.required.get(*f).is_empty())
            .collect()
    }

    /// Optional keys still unknown: every declared key not filled in, plus
    /// any present-but-empty extra key, in declaration order.
    pub fn missing_optional(&self) -> Vec<String> {
        let mut missing: Vec<String> = OptionalField::ALL
            .iter()
            .filter(|f| self.optional.get(f.key()).map_or(true, FieldValue::is_empty))
            .map(|f| f.key().to_string())
            .collect();
        missing.extend(
            self.optional
                .iter()
                .filter(|(k, v)| OptionalField::from_key(k).is_none() && v.is_empty())
                .map(|(k, _)| k.clone()),
        );
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }

    pub fn text_of(&self, field: RequiredField) -> Option<String> {
        self.required.get(field).text()
    }

    pub fn optional_text(&self, field: OptionalField) -> Option<String> {
        self.optional_field(field).and_then(FieldValue::text)
    }

    /// Survey mode if one has been stated.
    pub fn survey_mode(&self) -> Option<SurveyMode> {
        self.optional_text(OptionalField::Method)
            .and_then(|m| SurveyMode::parse(&m))
    }

    /// Explicit question count, clamped to the supported range.
    pub fn question_count(&self) -> Option<usize> {
        self.optional_text(OptionalField::QuestionCount)
            .and_then(|c| c.trim().parse::<i64>().ok())
            .map(clamp_question_count)
    }
}

impl Default for Requirements {
    fn default() -> Self {
        Self::empty()
    }
}
