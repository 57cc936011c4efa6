//! Assistant message texts.

use super::preview::PreviewDocument;
use crate::domain::survey::FollowUpQuestion;

pub const GENERATION_FAILED: &str =
    "設問を生成できませんでした。表現を変えてもう一度お試しください。";

pub const CUSTOMIZE_PROMPT: &str = "どのようなカスタマイズをしますか？\n例：設問数の増減、選択肢の追加・修正、質問タイプの変更、文言のトーン調整、対象者の変更 など";

pub const CONFIRMED: &str = "下書きを保存しました。確認画面へ移動します。";

pub const REFINE_PROMPT: &str = "補足したい内容をチャットで入力してください。";

/// Recorded as the user's side of "proceed to preview".
pub const PROCEED_CHOICE: &str = "この内容でプレビューする";

/// `label：question` followed by quick-pick candidates, if any.
pub fn follow_up_prompt(question: &FollowUpQuestion) -> String {
    let mut text = format!("{}：{}", question.path.label(), question.question_text);
    let candidates = question.candidates();
    if !candidates.is_empty() {
        text.push_str("\n候補: ");
        text.push_str(&candidates.join(" / "));
    }
    text
}

pub fn proposal(missing_optional: &[String]) -> String {
    let mut text = String::from("必須項目がそろいました。");
    if !missing_optional.is_empty() {
        text.push_str("\n未入力の任意項目: ");
        text.push_str(&missing_optional.join("、"));
    }
    text.push_str("\nこの内容でプレビューしますか？チャットで補足しますか？");
    text
}

pub fn generated(preview: &PreviewDocument) -> String {
    format!(
        "要件が揃いました。\nタイトル: {}\nモード: {}\n設問数: {}\nこの内容で設問をプレビューします。",
        preview.title,
        preview.mode.label(),
        preview.question_count()
    )
}

pub fn template_selected(title: &str) -> String {
    format!("テンプレート「{}」のプレビューを表示します。", title)
}

pub fn past_survey_selected(title: &str) -> String {
    format!("過去の調査「{}」のプレビューを表示します。", title)
}
