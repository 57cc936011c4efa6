//! Keyword tables for the local heuristic extractor.
//!
//! Each concern has exactly one table; both the labeled-line pass and the
//! whole-text pass read from here.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

use crate::domain::survey::{AudienceCategory, SurveyMode};

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

/// `key: value` with either an ASCII or a full-width colon.
pub static LABELED_LINE: Lazy<Regex> = Lazy::new(|| compile(r"^([^:：\s]+)\s*[:：]\s*(.+)$"));

pub static FIRST_NUMBER: Lazy<Regex> = Lazy::new(|| compile(r"(\d+)"));

/// Absolute count in running text, e.g. `5問`.
pub static COUNT_IN_TEXT: Lazy<Regex> = Lazy::new(|| compile(r"(\d+)\s*問"));

/// Relative count, e.g. `2問増やして` or `1問減らして`.
pub static COUNT_ADJUSTMENT: Lazy<Regex> =
    Lazy::new(|| compile(r"(\d+)\s*問\s*(増|追加|減|削)"));

/// A short need phrase ending in `したい` / `知りたい`.
pub static NEED_PHRASE: Lazy<Regex> = Lazy::new(|| compile(r"(.{0,12})(したい|知りたい)"));

static METHOD_MAIN: Lazy<Regex> = Lazy::new(|| compile(r"(?i)本調査|\bmain\b|じっくり"));
static METHOD_SCREENING: Lazy<Regex> =
    Lazy::new(|| compile(r"(?i)事前調査|\bscreening\b|対象.*絞|対象をしぼる|スクリーニング"));

static AUDIENCE_RULES: Lazy<Vec<(Regex, AudienceCategory)>> = Lazy::new(|| {
    vec![
        (compile("従業員|社員|ES"), AudienceCategory::Employee),
        (compile("顧客|ユーザー|会員|CS"), AudienceCategory::Customer),
        (compile("一般|消費者"), AudienceCategory::GeneralConsumer),
    ]
});

static THEME_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (compile("ES|従業員満足"), "従業員満足度（ES）調査"),
        (compile("CS|顧客満足"), "顧客満足度（CS）調査"),
        (compile("(?i)NPS"), "NPS調査"),
        (compile("ブランド認知|認知度"), "ブランド認知度調査"),
    ]
});

/// Purpose implied by a known theme, checked against the title.
static THEME_PURPOSES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (compile("(?i)NPS|推奨"), "推奨度とその理由の把握"),
        (compile("従業員|ES"), "従業員の満足度と組織の改善点の把握"),
        (compile("顧客満足|CS|満足"), "顧客の満足度と改善点の把握"),
        (compile("認知"), "認知状況と認知経路の把握"),
    ]
});

pub static ADD_OTHER_CHOICE: Lazy<Regex> = Lazy::new(|| compile("その他.*(追加|加え)"));
pub static SCALE_TO_SINGLE: Lazy<Regex> =
    Lazy::new(|| compile("(評価尺度|尺度|段階評価|スケール).*単一選択"));
pub static POLITE_TONE: Lazy<Regex> = Lazy::new(|| compile("丁寧"));

pub const OTHER_CHOICE_PREFERENCE: &str = "選択肢に「その他（自由記述）」を追加";
pub const SCALE_TO_SINGLE_PREFERENCE: &str = "評価尺度を単一選択に変更";
pub const POLITE_TONE_PREFERENCE: &str = "丁寧語";

/// Requirements slot a labeled line feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabeledKey {
    Title,
    Method,
    QuestionCount,
    Audience,
    Purpose,
}

impl LabeledKey {
    pub fn parse(key: &str) -> Option<Self> {
        let key = key.trim().to_lowercase();
        match key.as_str() {
            "テーマ" | "タイトル" | "調査タイトル" | "title" | "theme" => Some(LabeledKey::Title),
            "手法" | "調査手法" | "調査タイプ" | "method" => Some(LabeledKey::Method),
            "設問数" | "count" | "questions" => Some(LabeledKey::QuestionCount),
            "対象者" | "対象" | "調査対象者" | "audience" => Some(LabeledKey::Audience),
            "目的" | "調査目的" | "purpose" => Some(LabeledKey::Purpose),
            _ => None,
        }
    }
}

pub fn classify_method(text: &str) -> Option<SurveyMode> {
    if METHOD_MAIN.is_match(text) {
        Some(SurveyMode::Main)
    } else if METHOD_SCREENING.is_match(text) {
        Some(SurveyMode::Screening)
    } else {
        None
    }
}

/// First matching audience category, in precedence order.
pub fn classify_audience(text: &str) -> Option<AudienceCategory> {
    AUDIENCE_RULES
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, category)| *category)
}

/// Theme title and the byte span of the keyword that produced it.
pub fn match_theme(text: &str) -> Option<(&'static str, Range<usize>)> {
    THEME_RULES
        .iter()
        .find_map(|(re, title)| re.find(text).map(|m| (*title, m.range())))
}

pub fn implied_purpose(title: &str) -> Option<&'static str> {
    THEME_PURPOSES
        .iter()
        .find(|(re, _)| re.is_match(title))
        .map(|(_, purpose)| *purpose)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labeled_line_accepts_both_colons() {
        for line in ["テーマ: NPS調査", "テーマ：NPS調査", "テーマ ：  NPS調査"] {
            let caps = LABELED_LINE.captures(line).unwrap();
            assert_eq!(&caps[1], "テーマ");
            assert_eq!(caps[2].trim(), "NPS調査");
        }
    }

    #[test]
    fn method_vocabulary() {
        assert_eq!(classify_method("本調査"), Some(SurveyMode::Main));
        assert_eq!(classify_method("じっくり聞きたい"), Some(SurveyMode::Main));
        assert_eq!(classify_method("Screening"), Some(SurveyMode::Screening));
        assert_eq!(classify_method("対象を絞りたい"), Some(SurveyMode::Screening));
        assert_eq!(classify_method("domain"), None);
    }

    #[test]
    fn audience_precedence_is_employee_customer_general() {
        assert_eq!(classify_audience("社員と顧客"), Some(AudienceCategory::Employee));
        assert_eq!(classify_audience("一般の会員"), Some(AudienceCategory::Customer));
        assert_eq!(classify_audience("一般消費者"), Some(AudienceCategory::GeneralConsumer));
        assert_eq!(classify_audience("20代女性"), None);
    }

    #[test]
    fn theme_reports_keyword_span() {
        let (title, span) = match_theme("従業員満足度を知りたい").unwrap();
        assert_eq!(title, "従業員満足度（ES）調査");
        assert_eq!(&"従業員満足度を知りたい"[span], "従業員満足");
    }

    #[test]
    fn nps_theme_is_case_insensitive() {
        assert_eq!(match_theme("nps を測りたい").map(|t| t.0), Some("NPS調査"));
    }

    #[test]
    fn labeled_keys_cover_english_aliases() {
        assert_eq!(LabeledKey::parse("Title"), Some(LabeledKey::Title));
        assert_eq!(LabeledKey::parse("設問数"), Some(LabeledKey::QuestionCount));
        assert_eq!(LabeledKey::parse("予算"), None);
    }

    #[test]
    fn implied_purpose_follows_theme() {
        assert_eq!(implied_purpose("NPS調査"), Some("推奨度とその理由の把握"));
        assert_eq!(implied_purpose("アンケート調査"), None);
    }
}
