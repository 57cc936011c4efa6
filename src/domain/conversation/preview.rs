//! Preview documents and the confirmed hand-off draft.

use serde::{Deserialize, Serialize};

use crate::domain::generation::{display_category, rationale_for, DEFAULT_TITLE};
use crate::domain::survey::{
    FieldValue, OptionalField, QuestionFormat, QuestionSet, RequiredField, Requirements, Scale,
    SurveyMode,
};
use crate::ports::{PastSurvey, SurveyTemplate};

/// Audience shown when none is known.
pub const UNSET_AUDIENCE: &str = "未設定";

/// Shown in place of a question list when there is nothing to preview.
pub const EMPTY_STATE_MESSAGE: &str =
    "表示できる設問がありません。条件を変えてもう一度お試しください。";

/// What the preview was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PreviewOrigin {
    Chat,
    Template { id: String },
    PastSurvey { id: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewQuestion {
    pub id: String,
    pub text: String,
    pub format: QuestionFormat,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<Scale>,
    pub rationale: String,
    pub category: String,
}

impl PreviewQuestion {
    fn build(index: usize, text: &str, format: QuestionFormat, labels: &[String]) -> Self {
        let (options, scale) = if format == QuestionFormat::FivePointScale {
            let scale = Scale {
                min: 1,
                max: labels.len() as i64,
                labels: labels.to_vec(),
            };
            (Vec::new(), Some(scale))
        } else {
            (labels.to_vec(), None)
        };
        Self {
            id: format!("Q{}", index + 1),
            text: text.to_string(),
            format,
            options,
            scale,
            rationale: rationale_for(text, format).to_string(),
            category: display_category(index).to_string(),
        }
    }
}

/// A survey as the user sees it before confirming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewDocument {
    pub title: String,
    pub description: String,
    pub purpose: String,
    pub audience: String,
    pub mode: SurveyMode,
    pub origin: PreviewOrigin,
    pub questions: Vec<PreviewQuestion>,
    /// Present when the preview came from question generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_set: Option<QuestionSet>,
}

impl PreviewDocument {
    /// Preview of a generated question set.
    pub fn from_question_set(req: &Requirements, set: QuestionSet) -> Self {
        let mode = if set.main_questions.is_empty() && !set.screening_questions.is_empty() {
            SurveyMode::Screening
        } else {
            SurveyMode::Main
        };
        let questions = set
            .all_questions()
            .enumerate()
            .map(|(i, q)| PreviewQuestion {
                id: q.id.clone(),
                text: q.text.clone(),
                format: q.format,
                options: q.choices.iter().map(|c| c.label.clone()).collect(),
                scale: q.scale.clone(),
                rationale: set
                    .question_rationale
                    .get(&q.id)
                    .cloned()
                    .unwrap_or_else(|| rationale_for(&q.text, q.format).to_string()),
                category: display_category(i).to_string(),
            })
            .collect();
        let purpose = req.text_of(RequiredField::Purpose).unwrap_or_default();

        Self {
            title: req
                .text_of(RequiredField::Title)
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            description: purpose.clone(),
            purpose,
            audience: req
                .text_of(RequiredField::TargetAudience)
                .unwrap_or_else(|| UNSET_AUDIENCE.to_string()),
            mode,
            origin: PreviewOrigin::Chat,
            questions,
            question_set: Some(set),
        }
    }

    pub fn from_template(template: &SurveyTemplate) -> Self {
        let questions = template
            .questions
            .iter()
            .enumerate()
            .map(|(i, q)| PreviewQuestion::build(i, &q.text, q.format, &q.options))
            .collect();
        Self {
            title: template.title.clone(),
            description: template.description.clone(),
            purpose: template.purpose.clone(),
            audience: template.audience.clone(),
            mode: template.mode,
            origin: PreviewOrigin::Template {
                id: template.id.clone(),
            },
            questions,
            question_set: None,
        }
    }

    /// A past survey previews as a short fixed outline around its title.
    pub fn from_past_survey(survey: &PastSurvey) -> Self {
        let labels = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        let outline = [
            (
                format!("{}の総合評価を教えてください", survey.title),
                QuestionFormat::FivePointScale,
                labels(&["非常に不満", "不満", "普通", "満足", "非常に満足"]),
            ),
            (
                "重視する点を教えてください（複数選択可）".to_string(),
                QuestionFormat::MultiSelect,
                labels(&["品質", "価格", "使いやすさ", "サポート", "その他"]),
            ),
            (
                "改善してほしい点があれば教えてください".to_string(),
                QuestionFormat::FreeText,
                Vec::new(),
            ),
        ];
        let questions = outline
            .iter()
            .enumerate()
            .map(|(i, (text, format, options))| PreviewQuestion::build(i, text, *format, options))
            .collect();
        Self {
            title: survey.title.clone(),
            description: survey.description.clone(),
            purpose: survey.description.clone(),
            audience: survey.audience.clone(),
            mode: survey.mode,
            origin: PreviewOrigin::PastSurvey {
                id: survey.id.clone(),
            },
            questions,
            question_set: None,
        }
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// The brief this preview stands for, used as the base for edits.
    pub fn requirements(&self) -> Requirements {
        let mut req = Requirements::empty();
        let set = |text: &str| {
            if text.trim().is_empty() {
                FieldValue::empty()
            } else {
                FieldValue::user(text)
            }
        };
        req.required.title = set(&self.title);
        req.required.purpose = set(&self.purpose);
        if self.audience != UNSET_AUDIENCE {
            req.required.target_audience = set(&self.audience);
            req.required.analysis_audience = set(&self.audience);
        }
        req.set_optional(OptionalField::Method, FieldValue::user(self.mode.as_str()));
        if !self.is_empty() {
            req.set_optional(
                OptionalField::QuestionCount,
                FieldValue::user(self.question_count().to_string()),
            );
        }
        req
    }

    /// Text seeded into the chat when the user asks to edit this preview.
    pub fn edit_seed(&self) -> String {
        let mut seed = format!(
            "このテンプレートをベースに作成したいです。\nタイトル: {}\n対象: {}",
            self.title, self.audience
        );
        if !self.purpose.trim().is_empty() {
            seed.push_str(&format!("\n目的: {}", self.purpose));
        }
        seed
    }

    /// Flattens the preview into the hand-off draft, numbering `Q1..Qn`.
    pub fn handoff(&self) -> HandoffDraft {
        HandoffDraft {
            title: self.title.clone(),
            survey_type: self.mode,
            audience: (self.audience != UNSET_AUDIENCE).then(|| self.audience.clone()),
            questions: self
                .questions
                .iter()
                .enumerate()
                .map(|(i, q)| DraftQuestion {
                    id: format!("Q{}", i + 1),
                    text: q.text.clone(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftQuestion {
    pub id: String,
    pub text: String,
}

/// The one durable artifact: what the survey editor opens next.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandoffDraft {
    pub title: String,
    #[serde(rename = "type")]
    pub survey_type: SurveyMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audience: Option<String>,
    pub questions: Vec<DraftQuestion>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::generation::QuestionGenerator;
    use crate::ports::TemplateQuestion;
    use serde_json::json;

    fn template() -> SurveyTemplate {
        SurveyTemplate {
            id: "customer-satisfaction".into(),
            title: "顧客満足度（CS調査）".into(),
            description: "商品やサービスの満足度、改善点を確認".into(),
            category: "満足度・評価調査".into(),
            mode: SurveyMode::Main,
            audience: "既存顧客・サービス利用者".into(),
            purpose: "満足度と改善点を把握するための調査です。".into(),
            questions: vec![
                TemplateQuestion::new(
                    "当サービスの総合満足度を教えてください",
                    QuestionFormat::FivePointScale,
                    &["非常に不満", "不満", "普通", "満足", "非常に満足"],
                ),
                TemplateQuestion::new("改善点を教えてください", QuestionFormat::FreeText, &[]),
            ],
        }
    }

    #[test]
    fn generated_preview_falls_back_to_defaults() {
        let req = Requirements::empty();
        let set = QuestionGenerator::new().generate(&req);
        let preview = PreviewDocument::from_question_set(&req, set);

        assert_eq!(preview.title, DEFAULT_TITLE);
        assert_eq!(preview.audience, UNSET_AUDIENCE);
        assert_eq!(preview.mode, SurveyMode::Main);
        assert_eq!(preview.question_count(), 5);
        assert_eq!(preview.questions[0].category, "基本事実");
        assert!(preview.question_set.is_some());
    }

    #[test]
    fn template_scale_questions_get_bounds() {
        let preview = PreviewDocument::from_template(&template());
        let q = &preview.questions[0];
        assert_eq!(q.scale.as_ref().map(|s| (s.min, s.max)), Some((1, 5)));
        assert!(q.options.is_empty());
        assert_eq!(preview.origin, PreviewOrigin::Template { id: "customer-satisfaction".into() });
    }

    #[test]
    fn past_survey_outline_uses_title() {
        let survey = PastSurvey {
            id: "sv-001".into(),
            title: "新商品コンセプト評価".into(),
            description: "新商品の受容性を確認".into(),
            mode: SurveyMode::Main,
            audience: "一般消費者".into(),
            updated_on: "2024-05-01".into(),
            response_count: 120,
        };
        let preview = PreviewDocument::from_past_survey(&survey);
        assert_eq!(preview.question_count(), 3);
        assert_eq!(preview.questions[0].text, "新商品コンセプト評価の総合評価を教えてください");
    }

    #[test]
    fn edit_seed_lists_labeled_lines() {
        let seed = PreviewDocument::from_template(&template()).edit_seed();
        assert_eq!(
            seed,
            "このテンプレートをベースに作成したいです。\nタイトル: 顧客満足度（CS調査）\n対象: 既存顧客・サービス利用者\n目的: 満足度と改善点を把握するための調査です。"
        );
    }

    #[test]
    fn handoff_renumbers_and_omits_unknown_audience() {
        let req = Requirements::empty();
        let mut set = QuestionGenerator::new().generate(&req);
        set.main_questions[0].id = "X9".into();
        let draft = PreviewDocument::from_question_set(&req, set).handoff();

        assert_eq!(draft.questions[0].id, "Q1");
        assert!(draft.audience.is_none());
        let value = serde_json::to_value(&draft).unwrap();
        assert_eq!(value["type"], json!("main"));
        assert!(value.get("audience").is_none());
    }

    #[test]
    fn requirements_round_trip_the_brief() {
        let preview = PreviewDocument::from_template(&template());
        let req = preview.requirements();
        assert!(req.is_complete());
        assert_eq!(req.question_count(), Some(2));
        assert_eq!(req.survey_mode(), Some(SurveyMode::Main));
    }
}
