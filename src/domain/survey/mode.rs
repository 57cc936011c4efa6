//! Closed vocabularies shared by extraction and generation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Screening (eligibility filter) or main (substantive) questionnaire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurveyMode {
    Screening,
    Main,
}

impl SurveyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SurveyMode::Screening => "screening",
            SurveyMode::Main => "main",
        }
    }

    /// Parses the stored wire value.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "screening" => Some(SurveyMode::Screening),
            "main" => Some(SurveyMode::Main),
            _ => None,
        }
    }

    /// Question count used when the requirements leave it open.
    pub fn default_question_count(&self) -> usize {
        match self {
            SurveyMode::Screening => 3,
            SurveyMode::Main => 5,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SurveyMode::Screening => "事前調査",
            SurveyMode::Main => "本調査",
        }
    }

    /// Prefix for question ids emitted in this mode.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            SurveyMode::Screening => "S",
            SurveyMode::Main => "Q",
        }
    }
}

impl fmt::Display for SurveyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audience buckets recognised by the keyword classifier, in match precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AudienceCategory {
    Employee,
    Customer,
    GeneralConsumer,
}

impl AudienceCategory {
    pub const ALL: [AudienceCategory; 3] = [
        AudienceCategory::Employee,
        AudienceCategory::Customer,
        AudienceCategory::GeneralConsumer,
    ];

    /// Canonical label written into the requirements.
    pub fn label(&self) -> &'static str {
        match self {
            AudienceCategory::Employee => "従業員",
            AudienceCategory::Customer => "既存顧客",
            AudienceCategory::GeneralConsumer => "一般対象者",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.label() == label.trim())
    }
}

/// Hard bounds on the number of generated questions.
pub const MIN_QUESTION_COUNT: usize = 1;
pub const MAX_QUESTION_COUNT: usize = 20;

/// Clamps a requested count into the supported range.
pub fn clamp_question_count(n: i64) -> usize {
    n.clamp(MIN_QUESTION_COUNT as i64, MAX_QUESTION_COUNT as i64) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_defaults_differ_by_mode() {
        assert_eq!(SurveyMode::Screening.default_question_count(), 3);
        assert_eq!(SurveyMode::Main.default_question_count(), 5);
    }

    #[test]
    fn mode_parses_only_wire_values() {
        assert_eq!(SurveyMode::parse("main"), Some(SurveyMode::Main));
        assert_eq!(SurveyMode::parse(" screening "), Some(SurveyMode::Screening));
        assert_eq!(SurveyMode::parse("本調査"), None);
    }

    #[test]
    fn count_is_clamped_to_supported_range() {
        assert_eq!(clamp_question_count(0), 1);
        assert_eq!(clamp_question_count(7), 7);
        assert_eq!(clamp_question_count(99), 20);
    }

    #[test]
    fn audience_label_round_trips() {
        for c in AudienceCategory::ALL {
            assert_eq!(AudienceCategory::from_label(c.label()), Some(c));
        }
    }
}
