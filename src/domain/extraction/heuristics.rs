//! Local keyword extractor.
//!
//! Runs without any remote service. Labeled `key: value` lines are read
//! first; whatever they leave unresolved is filled from keyword matches on
//! the whole message, then from values derived from other fields.

use tracing::debug;

use super::vocabulary::{
    self, LabeledKey, ADD_OTHER_CHOICE, COUNT_ADJUSTMENT, COUNT_IN_TEXT, FIRST_NUMBER,
    LABELED_LINE, NEED_PHRASE, OTHER_CHOICE_PREFERENCE, POLITE_TONE, POLITE_TONE_PREFERENCE,
    SCALE_TO_SINGLE, SCALE_TO_SINGLE_PREFERENCE,
};
use crate::domain::survey::{
    clamp_question_count, FieldSource, FieldValue, OptionalField, RequiredField, Requirements,
    DERIVED_CONFIDENCE, LABELED_CONFIDENCE, WHOLE_TEXT_CONFIDENCE,
};

/// Longest message the extractor looks at, in characters.
pub const MAX_INPUT_CHARS: usize = 4000;

/// Result of a local extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalExtraction {
    pub requirements: Requirements,
    /// Relative change to the question count ("2問増やして" is `+2`).
    pub count_adjustment: Option<i64>,
}

/// Heuristic extractor over free-form Japanese or English text.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExtractor;

impl LocalExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> LocalExtraction {
        let text = sanitize(text);
        let mut req = Requirements::empty();

        self.read_labeled_lines(&text, &mut req);
        let count_adjustment = detect_count_adjustment(&text);
        self.read_whole_text(&text, &mut req, count_adjustment.is_some());
        self.derive_fields(&mut req);
        self.read_preferences(&text, &mut req);

        debug!(
            missing_required = req.missing_required().len(),
            count_adjustment = ?count_adjustment,
            "local extraction finished"
        );

        LocalExtraction {
            requirements: req,
            count_adjustment,
        }
    }

    fn read_labeled_lines(&self, text: &str, req: &mut Requirements) {
        for line in text.lines() {
            let Some(caps) = LABELED_LINE.captures(line.trim()) else {
                continue;
            };
            let Some(key) = LabeledKey::parse(&caps[1]) else {
                continue;
            };
            let value = caps[2].trim();
            if value.is_empty() {
                continue;
            }
            let labeled = |v: &str| FieldValue::new(v, FieldSource::User, LABELED_CONFIDENCE);
            match key {
                LabeledKey::Title => req.required.title = labeled(value),
                LabeledKey::Purpose => req.required.purpose = labeled(value),
                LabeledKey::Audience => {
                    let audience = vocabulary::classify_audience(value)
                        .map(|c| c.label())
                        .unwrap_or(value);
                    req.required.target_audience = labeled(audience);
                }
                LabeledKey::Method => {
                    if let Some(mode) = vocabulary::classify_method(value) {
                        req.set_optional(OptionalField::Method, labeled(mode.as_str()));
                    }
                }
                LabeledKey::QuestionCount => {
                    if let Some(n) = first_number(value) {
                        let count = clamp_question_count(n).to_string();
                        req.set_optional(OptionalField::QuestionCount, labeled(count.as_str()));
                    }
                }
            }
        }
    }

    fn read_whole_text(&self, text: &str, req: &mut Requirements, has_adjustment: bool) {
        let inferred = |v: &str| FieldValue::inferred(v, WHOLE_TEXT_CONFIDENCE);

        // The theme keyword is masked so that e.g. "ES" in a theme does not
        // double as an audience hit.
        let mut rest = text.to_string();
        if let Some((title, span)) = vocabulary::match_theme(text) {
            if req.required.title.is_empty() {
                req.required.title = inferred(title);
            }
            rest.replace_range(span.clone(), &" ".repeat(span.len()));
        }

        if req.required.target_audience.is_empty() {
            if let Some(category) = vocabulary::classify_audience(&rest) {
                req.required.target_audience = inferred(category.label());
            }
        }

        if req.optional_field(OptionalField::Method).map_or(true, FieldValue::is_empty) {
            if let Some(mode) = vocabulary::classify_method(text) {
                req.set_optional(OptionalField::Method, inferred(mode.as_str()));
            }
        }

        let count_missing = req
            .optional_field(OptionalField::QuestionCount)
            .map_or(true, FieldValue::is_empty);
        if count_missing && !has_adjustment {
            if let Some(n) = COUNT_IN_TEXT
                .captures(text)
                .and_then(|c| c[1].parse::<i64>().ok())
            {
                let count = clamp_question_count(n).to_string();
                req.set_optional(OptionalField::QuestionCount, inferred(count.as_str()));
            }
        }

        if req.required.purpose.is_empty() {
            if let Some(phrase) = need_phrase(text) {
                req.required.purpose = inferred(phrase.as_str());
            }
        }
    }

    fn derive_fields(&self, req: &mut Requirements) {
        let derived = |v: &str| FieldValue::inferred(v, DERIVED_CONFIDENCE);

        if req.required.purpose.is_empty() {
            if let Some(purpose) = req
                .text_of(RequiredField::Title)
                .and_then(|t| vocabulary::implied_purpose(&t))
            {
                req.required.purpose = derived(purpose);
            }
        }

        if req.required.analysis_audience.is_empty() {
            if let Some(audience) = req.text_of(RequiredField::TargetAudience) {
                req.required.analysis_audience = derived(audience.as_str());
            }
        }
    }

    fn read_preferences(&self, text: &str, req: &mut Requirements) {
        let preference = |v: &str| FieldValue::new(v, FieldSource::User, LABELED_CONFIDENCE);
        if ADD_OTHER_CHOICE.is_match(text) {
            req.set_optional(OptionalField::AnswerFormat, preference(OTHER_CHOICE_PREFERENCE));
        }
        if SCALE_TO_SINGLE.is_match(text) {
            req.set_optional(OptionalField::QuestionType, preference(SCALE_TO_SINGLE_PREFERENCE));
        }
        if POLITE_TONE.is_match(text) {
            req.set_optional(OptionalField::Tone, preference(POLITE_TONE_PREFERENCE));
        }
    }
}

/// Signed count change requested in `text`, if any.
pub fn detect_count_adjustment(text: &str) -> Option<i64> {
    let caps = COUNT_ADJUSTMENT.captures(text)?;
    let n: i64 = caps[1].parse().ok()?;
    match &caps[2] {
        "減" | "削" => Some(-n),
        _ => Some(n),
    }
}

/// Drops control characters, folds full-width digits and caps the length.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            _ => c,
        })
        .take(MAX_INPUT_CHARS)
        .collect()
}

fn first_number(value: &str) -> Option<i64> {
    FIRST_NUMBER
        .captures(value)
        .and_then(|c| c[1].parse::<i64>().ok())
}

fn need_phrase(text: &str) -> Option<String> {
    let caps = NEED_PHRASE.captures(text)?;
    if caps[1].trim().is_empty() {
        return None;
    }
    let phrase = caps[0]
        .trim()
        .trim_start_matches(|c: char| matches!(c, '、' | '。' | ',' | '.' | '，'))
        .trim();
    (!phrase.is_empty()).then(|| phrase.to_string())
}
