//! Built-in follow-up questions, one per required field.

use crate::domain::survey::{
    AudienceCategory, ExpectedFormat, FollowUpQuestion, Priority, RequiredField,
};

/// Id prefix of engine-synthesized questions.
pub const BUILT_IN_ID_PREFIX: &str = "depth-";

/// The question asked when `field` is missing and no proposal covers it.
pub fn built_in_question(field: RequiredField) -> FollowUpQuestion {
    let (text, examples, priority): (&str, Vec<String>, Priority) = match field {
        RequiredField::Title => (
            "調査のテーマやタイトルを教えてください。",
            vec!["顧客満足度調査".into(), "新商品コンセプト評価".into()],
            Priority::High,
        ),
        RequiredField::Purpose => (
            "この調査で明らかにしたいことは何ですか？",
            vec!["満足度と改善点の把握".into(), "購入意向の確認".into()],
            Priority::High,
        ),
        RequiredField::TargetAudience => (
            "どのような方に回答してもらいますか？",
            AudienceCategory::ALL.iter().map(|c| c.label().to_string()).collect(),
            Priority::High,
        ),
        RequiredField::AnalysisAudience => (
            "分析の対象とする回答者の条件を教えてください。",
            vec!["回答者全体".into(), "利用経験者のみ".into()],
            Priority::Medium,
        ),
    };

    FollowUpQuestion {
        id: format!("{}{}", BUILT_IN_ID_PREFIX, field.key()),
        target_field: field.key().to_string(),
        path: field.path(),
        question_text: text.to_string(),
        expected_format: ExpectedFormat::Text,
        options: Vec::new(),
        validation: None,
        example_answers: examples,
        priority,
        depends_on: Vec::new(),
    }
}
