//! The QuestionSet document: screening and main questions with routing.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

use super::meta::Meta;

/// Terminal token for branch targets.
pub const END_TOKEN: &str = "END";

/// Answer format presented to respondents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuestionFormat {
    #[serde(rename = "single-select")]
    SingleSelect,
    #[serde(rename = "multi-select")]
    MultiSelect,
    #[serde(rename = "free-text")]
    FreeText,
    #[serde(rename = "numeric")]
    Numeric,
    #[serde(rename = "5-point-scale")]
    FivePointScale,
}

impl QuestionFormat {
    pub const ALL: [QuestionFormat; 5] = [
        QuestionFormat::SingleSelect,
        QuestionFormat::MultiSelect,
        QuestionFormat::FreeText,
        QuestionFormat::Numeric,
        QuestionFormat::FivePointScale,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionFormat::SingleSelect => "single-select",
            QuestionFormat::MultiSelect => "multi-select",
            QuestionFormat::FreeText => "free-text",
            QuestionFormat::Numeric => "numeric",
            QuestionFormat::FivePointScale => "5-point-scale",
        }
    }

    pub fn internal_type(&self) -> InternalType {
        match self {
            QuestionFormat::SingleSelect => InternalType::Sa,
            QuestionFormat::MultiSelect => InternalType::Ma,
            QuestionFormat::FreeText => InternalType::Fa,
            QuestionFormat::Numeric => InternalType::Nu,
            QuestionFormat::FivePointScale => InternalType::Scale,
        }
    }

    pub fn has_choices(&self) -> bool {
        matches!(self, QuestionFormat::SingleSelect | QuestionFormat::MultiSelect)
    }
}

/// Survey-engine type code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InternalType {
    #[serde(rename = "SA")]
    Sa,
    #[serde(rename = "MA")]
    Ma,
    #[serde(rename = "FA")]
    Fa,
    #[serde(rename = "NU")]
    Nu,
    #[serde(rename = "Scale")]
    Scale,
}

impl InternalType {
    pub const CODES: [&'static str; 5] = ["SA", "MA", "FA", "NU", "Scale"];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub code: String,
    pub label: String,
}

impl Choice {
    /// Numbers labels `1..n` in order.
    pub fn numbered<S: AsRef<str>>(labels: &[S]) -> Vec<Choice> {
        labels
            .iter()
            .enumerate()
            .map(|(i, label)| Choice {
                code: (i + 1).to_string(),
                label: label.as_ref().to_string(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scale {
    pub min: i64,
    pub max: i64,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    pub format: QuestionFormat,
    pub internal_type: InternalType,
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_purpose: Option<String>,
}

/// Labels for the two sub-methods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MethodDecomposition {
    pub screening: String,
    pub main: String,
}

impl Default for MethodDecomposition {
    fn default() -> Self {
        Self {
            screening: "対象者抽出（事前調査）".to_string(),
            main: "本調査".to_string(),
        }
    }
}

/// Match condition of a branch rule. At most one matcher is normally set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BranchWhen {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equals: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regex: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BranchRule {
    pub from: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<BranchWhen>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_to: Option<String>,
    #[serde(default, rename = "else", skip_serializing_if = "Option::is_none")]
    pub otherwise: Option<String>,
}

/// Soft limits the generator respects.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionConstraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_screening: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_main: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,
}

/// A branch rule points at a question that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("branchRules[{rule_index}].{field} refers to unknown question '{target}'")]
pub struct ReferentialIntegrityError {
    pub rule_index: usize,
    pub field: &'static str,
    pub target: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionSet {
    pub meta: Meta,
    pub method_decomposition: MethodDecomposition,
    #[serde(default)]
    pub screening_questions: Vec<Question>,
    #[serde(default)]
    pub main_questions: Vec<Question>,
    #[serde(default)]
    pub question_rationale: BTreeMap<String, String>,
    #[serde(default)]
    pub branch_rules: Vec<BranchRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<QuestionConstraints>,
}

impl QuestionSet {
    /// Screening questions first, then main questions.
    pub fn all_questions(&self) -> impl Iterator<Item = &Question> {
        self.screening_questions.iter().chain(self.main_questions.iter())
    }

    pub fn question_count(&self) -> usize {
        self.screening_questions.len() + self.main_questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.question_count() == 0
    }

    /// Verifies every `from`/`goTo`/`else` names a question or `END`.
    pub fn check_references(&self) -> Result<(), ReferentialIntegrityError> {
        let ids: HashSet<&str> = self.all_questions().map(|q| q.id.as_str()).collect();
        let known = |target: &str| target == END_TOKEN || ids.contains(target);

        for (rule_index, rule) in self.branch_rules.iter().enumerate() {
            let targets = [
                ("from", Some(rule.from.as_str())),
                ("goTo", rule.go_to.as_deref()),
                ("else", rule.otherwise.as_deref()),
            ];
            for (field, target) in targets {
                if let Some(target) = target {
                    if !known(target) {
                        return Err(ReferentialIntegrityError {
                            rule_index,
                            field,
                            target: target.to_string(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str) -> Question {
        Question {
            id: id.to_string(),
            text: format!("{}の設問", id),
            format: QuestionFormat::SingleSelect,
            internal_type: InternalType::Sa,
            choices: Choice::numbered(&["はい", "いいえ"]),
            scale: None,
            analysis_purpose: None,
        }
    }

    fn set_with_rule(rule: BranchRule) -> QuestionSet {
        QuestionSet {
            meta: Meta::new(),
            method_decomposition: MethodDecomposition::default(),
            screening_questions: vec![question("S1"), question("S2")],
            main_questions: vec![question("Q1")],
            question_rationale: BTreeMap::new(),
            branch_rules: vec![rule],
            constraints: None,
        }
    }

    mod references {
        use super::*;

        #[test]
        fn known_ids_and_end_are_accepted() {
            let set = set_with_rule(BranchRule {
                from: "S1".into(),
                when: Some(BranchWhen {
                    code: Some("1".into()),
                    ..Default::default()
                }),
                go_to: Some("Q1".into()),
                otherwise: Some(END_TOKEN.into()),
            });
            assert_eq!(set.check_references(), Ok(()));
        }

        #[test]
        fn dangling_go_to_is_reported_with_location() {
            let set = set_with_rule(BranchRule {
                from: "S1".into(),
                when: None,
                go_to: Some("Q9".into()),
                otherwise: None,
            });
            let err = set.check_references().unwrap_err();
            assert_eq!(err.rule_index, 0);
            assert_eq!(err.field, "goTo");
            assert_eq!(err.target, "Q9");
        }

        #[test]
        fn dangling_from_is_reported() {
            let set = set_with_rule(BranchRule {
                from: "X1".into(),
                when: None,
                go_to: None,
                otherwise: Some(END_TOKEN.into()),
            });
            assert_eq!(set.check_references().unwrap_err().field, "from");
        }
    }

    #[test]
    fn format_maps_to_internal_type() {
        assert_eq!(QuestionFormat::FivePointScale.internal_type(), InternalType::Scale);
        assert_eq!(QuestionFormat::FreeText.internal_type(), InternalType::Fa);
    }

    #[test]
    fn wire_names_match_survey_engine() {
        let q = serde_json::to_value(question("Q1")).unwrap();
        assert_eq!(q["format"], "single-select");
        assert_eq!(q["internalType"], "SA");
    }

    #[test]
    fn else_field_uses_reserved_word_on_the_wire() {
        let rule = BranchRule {
            from: "S1".into(),
            when: None,
            go_to: None,
            otherwise: Some(END_TOKEN.into()),
        };
        let json = serde_json::to_value(rule).unwrap();
        assert_eq!(json["else"], "END");
        assert!(json.get("goTo").is_none());
    }

    #[test]
    fn numbered_choices_start_at_one() {
        let choices = Choice::numbered(&["a", "b", "c"]);
        assert_eq!(choices[2].code, "3");
    }
}
