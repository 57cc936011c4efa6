//! Follow-up planning over a Requirements document.

use std::collections::BTreeMap;

use super::prompts::built_in_question;
use crate::domain::survey::{
    FieldPath, FollowUp, FollowUpQuestion, Meta, NextAction, OptionalField, RequiredField,
    Requirements,
};

/// Decides which fields still need asking and in what order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthEngine;

impl DepthEngine {
    pub fn new() -> Self {
        Self
    }

    /// Missing field keys: required gaps while any remain, otherwise the
    /// optional gaps.
    pub fn scan(&self, req: &Requirements) -> Vec<String> {
        let required = req.missing_required();
        if required.is_empty() {
            req.missing_optional()
        } else {
            required.iter().map(|f| f.key().to_string()).collect()
        }
    }

    /// Display labels of the optional fields still open.
    pub fn missing_optional_labels(&self, req: &Requirements) -> Vec<String> {
        req.missing_optional()
            .into_iter()
            .map(|key| {
                OptionalField::from_key(&key)
                    .map(|f| f.label().to_string())
                    .unwrap_or(key)
            })
            .collect()
    }

    /// Builds the follow-up plan.
    ///
    /// Questions from `proposal` are kept only when they address a required
    /// field that is still missing; every other missing required field gets a
    /// built-in question. Optional gaps never produce a question and are
    /// listed as deferred instead.
    pub fn plan(&self, req: &Requirements, proposal: Option<&FollowUp>) -> FollowUp {
        let missing_required = req.missing_required();

        let mut questions: Vec<FollowUpQuestion> = Vec::new();
        let proposed = proposal.map(|p| p.additional_questions.as_slice()).unwrap_or(&[]);
        for q in proposed {
            let wanted = matches!(q.path, FieldPath::Required(f) if missing_required.contains(&f));
            if wanted && !questions.iter().any(|kept| kept.path == q.path) {
                questions.push(q.clone());
            }
        }
        for field in &missing_required {
            let path = field.path();
            if !questions.iter().any(|q| q.path == path) {
                questions.push(built_in_question(*field));
            }
        }

        questions.sort_by_key(|q| (q.priority, declaration_rank(&q.path)));

        let ids: Vec<String> = questions.iter().map(|q| q.id.clone()).collect();
        for q in &mut questions {
            q.depends_on.retain(|dep| ids.contains(dep));
        }

        let field_mapping: BTreeMap<String, String> = questions
            .iter()
            .map(|q| (q.path.to_string(), q.id.clone()))
            .collect();

        let missing_fields = self.scan(req);
        let deferred_fields = if missing_required.is_empty() {
            missing_fields.clone()
        } else {
            Vec::new()
        };

        let next_action = if questions.is_empty() {
            NextAction::Proceed
        } else {
            NextAction::Confirm
        };

        FollowUp {
            meta: Meta::new(),
            missing_fields,
            additional_questions: questions,
            field_mapping,
            deferred_fields,
            next_action,
            display_text: proposal.and_then(|p| p.display_text.clone()),
        }
    }
}

fn declaration_rank(path: &FieldPath) -> usize {
    match path {
        FieldPath::Required(f) => RequiredField::ALL
            .iter()
            .position(|r| r == f)
            .unwrap_or(RequiredField::ALL.len()),
        FieldPath::Optional(key) => RequiredField::ALL.len() + OptionalField::rank_of(key),
    }
}
