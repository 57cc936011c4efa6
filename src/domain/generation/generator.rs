//! Local question generation from a Requirements document.

use std::collections::BTreeMap;

use tracing::debug;

use super::tables::{self, Blueprint, DEFAULT_TITLE, SUPPLEMENTARY_PATTERNS};
use crate::domain::survey::{
    BranchRule, BranchWhen, Choice, MethodDecomposition, Meta, OptionalField, Question,
    QuestionConstraints, QuestionFormat, QuestionSet, RequiredField, Requirements, Scale,
    SurveyMode, END_TOKEN, MAX_QUESTION_COUNT,
};
use crate::domain::extraction::vocabulary::{
    OTHER_CHOICE_PREFERENCE, POLITE_TONE_PREFERENCE, SCALE_TO_SINGLE_PREFERENCE,
};

/// Label appended by the "other" preference.
pub const OTHER_CHOICE_LABEL: &str = "その他（自由記述）";

const POLITE_REWRITES: [(&str, &str); 2] = [
    ("教えてください", "お聞かせください"),
    ("評価してください", "ご評価ください"),
];

/// Presentation preferences recorded in the brief.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Preferences {
    pub add_other_choice: bool,
    pub scale_as_single: bool,
    pub polite_tone: bool,
}

impl Preferences {
    pub fn from_requirements(req: &Requirements) -> Self {
        let is = |field, expected: &str| req.optional_text(field).as_deref() == Some(expected);
        Self {
            add_other_choice: is(OptionalField::AnswerFormat, OTHER_CHOICE_PREFERENCE),
            scale_as_single: is(OptionalField::QuestionType, SCALE_TO_SINGLE_PREFERENCE),
            polite_tone: is(OptionalField::Tone, POLITE_TONE_PREFERENCE),
        }
    }
}

/// Seeds-plus-patterns generator. Always produces exactly the target count.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionGenerator;

impl QuestionGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, req: &Requirements) -> QuestionSet {
        let mode = req.survey_mode().unwrap_or(SurveyMode::Main);
        let count = req
            .question_count()
            .unwrap_or_else(|| mode.default_question_count());
        let title = req
            .text_of(RequiredField::Title)
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let prefs = Preferences::from_requirements(req);

        let blueprints = extend_to_count(tables::seeds(mode), count);
        let mut questions = Vec::with_capacity(blueprints.len());
        let mut rationale = BTreeMap::new();
        for (i, blueprint) in blueprints.iter().enumerate() {
            let id = format!("{}{}", mode.id_prefix(), i + 1);
            let question = build_question(&id, blueprint, &title, prefs);
            rationale.insert(
                id,
                tables::rationale_for(&question.text, question.format).to_string(),
            );
            questions.push(question);
        }

        let mut branch_rules = Vec::new();
        if mode == SurveyMode::Screening && questions.len() >= 2 {
            branch_rules.push(BranchRule {
                from: questions[0].id.clone(),
                when: Some(BranchWhen {
                    code: Some("1".to_string()),
                    ..BranchWhen::default()
                }),
                go_to: Some(questions[1].id.clone()),
                otherwise: Some(END_TOKEN.to_string()),
            });
        }

        debug!(mode = %mode, count = questions.len(), ?prefs, "generated question set locally");

        let (screening_questions, main_questions) = match mode {
            SurveyMode::Screening => (questions, Vec::new()),
            SurveyMode::Main => (Vec::new(), questions),
        };

        QuestionSet {
            meta: Meta::new(),
            method_decomposition: MethodDecomposition::default(),
            screening_questions,
            main_questions,
            question_rationale: rationale,
            branch_rules,
            constraints: Some(QuestionConstraints {
                max_screening: Some(MAX_QUESTION_COUNT as u32),
                max_main: Some(MAX_QUESTION_COUNT as u32),
                max_depth: None,
            }),
        }
    }
}

/// Pads `seeds` by cycling the supplementary patterns from the first one,
/// then truncates to exactly `count`.
pub fn extend_to_count(seeds: &[Blueprint], count: usize) -> Vec<Blueprint> {
    let mut out: Vec<Blueprint> = seeds.to_vec();
    let mut patterns = SUPPLEMENTARY_PATTERNS.iter().cycle();
    while out.len() < count {
        match patterns.next() {
            Some(p) => out.push(*p),
            None => break,
        }
    }
    out.truncate(count);
    out
}

fn build_question(id: &str, blueprint: &Blueprint, title: &str, prefs: Preferences) -> Question {
    let mut text = blueprint.render(title);
    let mut format = blueprint.format;
    let mut labels: Vec<String> = blueprint.labels.iter().map(|l| l.to_string()).collect();

    if prefs.scale_as_single && format == QuestionFormat::FivePointScale {
        format = QuestionFormat::SingleSelect;
    }
    if prefs.add_other_choice
        && format.has_choices()
        && !labels.iter().any(|l| l.contains("その他"))
    {
        labels.push(OTHER_CHOICE_LABEL.to_string());
    }
    if prefs.polite_tone {
        for (plain, polite) in POLITE_REWRITES {
            text = text.replace(plain, polite);
        }
    }

    let (choices, scale) = match format {
        QuestionFormat::SingleSelect | QuestionFormat::MultiSelect => (Choice::numbered(&labels), None),
        QuestionFormat::FivePointScale => {
            let scale = Scale {
                min: 1,
                max: labels.len() as i64,
                labels,
            };
            (Vec::new(), Some(scale))
        }
        QuestionFormat::FreeText | QuestionFormat::Numeric => (Vec::new(), None),
    };

    Question {
        id: id.to_string(),
        text,
        format,
        internal_type: format.internal_type(),
        choices,
        scale,
        analysis_purpose: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::FieldValue;

    fn brief(mode: Option<&str>, count: Option<&str>) -> Requirements {
        let mut req = Requirements::empty();
        req.required.title = FieldValue::user("NPS調査");
        if let Some(m) = mode {
            req.set_optional(OptionalField::Method, FieldValue::user(m));
        }
        if let Some(c) = count {
            req.set_optional(OptionalField::QuestionCount, FieldValue::user(c));
        }
        req
    }

    mod counts {
        use super::*;

        #[test]
        fn main_defaults_to_five_with_one_pattern() {
            let set = QuestionGenerator::new().generate(&brief(None, None));
            assert!(set.screening_questions.is_empty());
            assert_eq!(set.main_questions.len(), 5);
            assert_eq!(set.main_questions[4].text, "NPS調査の認知経路を教えてください。");
        }

        #[test]
        fn screening_defaults_to_three() {
            let set = QuestionGenerator::new().generate(&brief(Some("screening"), None));
            assert_eq!(set.screening_questions.len(), 3);
            assert_eq!(set.screening_questions[0].id, "S1");
        }

        #[test]
        fn explicit_count_truncates_seeds() {
            let set = QuestionGenerator::new().generate(&brief(Some("main"), Some("3")));
            let ids: Vec<&str> = set.main_questions.iter().map(|q| q.id.as_str()).collect();
            assert_eq!(ids, vec!["Q1", "Q2", "Q3"]);
        }

        #[test]
        fn patterns_cycle_from_the_first() {
            let padded = extend_to_count(&SUPPLEMENTARY_PATTERNS[..0], 5);
            let texts: Vec<&str> = padded.iter().map(|b| b.text).collect();
            assert_eq!(
                texts,
                vec![
                    SUPPLEMENTARY_PATTERNS[0].text,
                    SUPPLEMENTARY_PATTERNS[1].text,
                    SUPPLEMENTARY_PATTERNS[2].text,
                    SUPPLEMENTARY_PATTERNS[0].text,
                    SUPPLEMENTARY_PATTERNS[1].text,
                ]
            );
        }

        #[test]
        fn three_seeds_to_five_appends_two_patterns() {
            let seeds = &tables::MAIN_SEEDS[..3];
            let padded = extend_to_count(seeds, 5);
            assert_eq!(padded.len(), 5);
            assert_eq!(padded[3], SUPPLEMENTARY_PATTERNS[0]);
            assert_eq!(padded[4], SUPPLEMENTARY_PATTERNS[1]);
        }
    }

    mod shape {
        use super::*;

        #[test]
        fn every_question_has_a_rationale() {
            let set = QuestionGenerator::new().generate(&brief(None, Some("8")));
            for q in set.all_questions() {
                assert!(set.question_rationale.contains_key(&q.id));
            }
        }

        #[test]
        fn scale_questions_carry_bounds() {
            let set = QuestionGenerator::new().generate(&brief(None, None));
            let scale = set.main_questions[1].scale.as_ref().unwrap();
            assert_eq!((scale.min, scale.max), (1, 5));
            assert!(set.main_questions[1].choices.is_empty());
        }

        #[test]
        fn screening_gate_routes_to_next_or_end() {
            let set = QuestionGenerator::new().generate(&brief(Some("screening"), None));
            assert_eq!(set.branch_rules.len(), 1);
            let rule = &set.branch_rules[0];
            assert_eq!(rule.from, "S1");
            assert_eq!(rule.go_to.as_deref(), Some("S2"));
            assert_eq!(rule.otherwise.as_deref(), Some(END_TOKEN));
            assert!(set.check_references().is_ok());
        }

        #[test]
        fn single_screening_question_has_no_gate() {
            let set = QuestionGenerator::new().generate(&brief(Some("screening"), Some("1")));
            assert!(set.branch_rules.is_empty());
        }

        #[test]
        fn missing_title_uses_default() {
            let set = QuestionGenerator::new().generate(&Requirements::empty());
            assert!(set.main_questions[0].text.starts_with(DEFAULT_TITLE));
        }
    }

    mod preferences {
        use super::*;

        #[test]
        fn other_choice_is_added_once() {
            let mut req = brief(None, None);
            req.set_optional(OptionalField::AnswerFormat, FieldValue::user(OTHER_CHOICE_PREFERENCE));
            let set = QuestionGenerator::new().generate(&req);

            let usage = &set.main_questions[0];
            assert_eq!(usage.choices.last().unwrap().label, OTHER_CHOICE_LABEL);
            let factors = &set.main_questions[2];
            let others = factors.choices.iter().filter(|c| c.label.contains("その他")).count();
            assert_eq!(others, 1);
        }

        #[test]
        fn scale_becomes_single_select() {
            let mut req = brief(None, None);
            req.set_optional(OptionalField::QuestionType, FieldValue::user(SCALE_TO_SINGLE_PREFERENCE));
            let set = QuestionGenerator::new().generate(&req);

            let q = &set.main_questions[1];
            assert_eq!(q.format, QuestionFormat::SingleSelect);
            assert!(q.scale.is_none());
            assert_eq!(q.choices.len(), 5);
        }

        #[test]
        fn converted_scales_also_get_the_other_choice() {
            let mut req = brief(None, None);
            req.set_optional(OptionalField::QuestionType, FieldValue::user(SCALE_TO_SINGLE_PREFERENCE));
            req.set_optional(OptionalField::AnswerFormat, FieldValue::user(OTHER_CHOICE_PREFERENCE));
            let set = QuestionGenerator::new().generate(&req);

            let q = &set.main_questions[1];
            assert_eq!(q.format, QuestionFormat::SingleSelect);
            assert_eq!(q.choices.len(), 6);
            assert_eq!(q.choices.last().unwrap().label, OTHER_CHOICE_LABEL);
        }

        #[test]
        fn polite_tone_rewrites_requests() {
            let mut req = brief(None, None);
            req.set_optional(OptionalField::Tone, FieldValue::user(POLITE_TONE_PREFERENCE));
            let set = QuestionGenerator::new().generate(&req);
            assert!(set.all_questions().all(|q| !q.text.contains("教えてください")));
        }
    }
}
