//! Lookup tables shared by local generation and the preview builder.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::survey::{QuestionFormat, SurveyMode};

/// Title used when the brief never named one.
pub const DEFAULT_TITLE: &str = "アンケート調査";

/// Placeholder substituted with the survey title.
pub const TITLE_PLACEHOLDER: &str = "{title}";

/// A question shape before it is numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blueprint {
    pub text: &'static str,
    pub format: QuestionFormat,
    pub labels: &'static [&'static str],
}

impl Blueprint {
    const fn new(text: &'static str, format: QuestionFormat, labels: &'static [&'static str]) -> Self {
        Self { text, format, labels }
    }

    pub fn render(&self, title: &str) -> String {
        self.text.replace(TITLE_PLACEHOLDER, title)
    }
}

/// Eligibility, demographic and experience gates.
pub const SCREENING_SEEDS: [Blueprint; 3] = [
    Blueprint::new(
        "本テーマに関する対象条件に当てはまりますか？",
        QuestionFormat::SingleSelect,
        &["当てはまる", "当てはまらない", "わからない"],
    ),
    Blueprint::new(
        "あなたの属性について教えてください（年代）",
        QuestionFormat::SingleSelect,
        &["18-24歳", "25-34歳", "35-44歳", "45-54歳", "55歳以上"],
    ),
    Blueprint::new(
        "本テーマに関連する経験はありますか？",
        QuestionFormat::SingleSelect,
        &["現在経験中", "過去に経験あり", "未経験"],
    ),
];

/// Usage status, overall satisfaction, priority factors, open improvement.
pub const MAIN_SEEDS: [Blueprint; 4] = [
    Blueprint::new(
        "{title}に関する現在の利用状況を教えてください。",
        QuestionFormat::SingleSelect,
        &["現在利用中", "過去に利用", "未利用"],
    ),
    Blueprint::new(
        "{title}に対する総合満足度を教えてください。",
        QuestionFormat::FivePointScale,
        &["非常に不満", "不満", "普通", "満足", "非常に満足"],
    ),
    Blueprint::new(
        "{title}に関して重要視する点を教えてください。（複数選択可）",
        QuestionFormat::MultiSelect,
        &["品質", "価格", "利便性", "サポート", "ブランド", "その他（自由記述）"],
    ),
    Blueprint::new(
        "{title}の改善してほしい点があれば、具体的に教えてください。",
        QuestionFormat::FreeText,
        &[],
    ),
];

/// Awareness channel, reuse intent, recommendation. Cycled in this order.
pub const SUPPLEMENTARY_PATTERNS: [Blueprint; 3] = [
    Blueprint::new(
        "{title}の認知経路を教えてください。",
        QuestionFormat::MultiSelect,
        &["SNS", "検索", "口コミ", "広告", "店頭", "その他（自由記述）"],
    ),
    Blueprint::new(
        "{title}の再利用意向を教えてください。",
        QuestionFormat::SingleSelect,
        &["必ず利用する", "おそらく利用する", "わからない", "あまり利用しない", "利用しない"],
    ),
    Blueprint::new(
        "{title}の推奨度を5段階で評価してください。",
        QuestionFormat::FivePointScale,
        &["全く勧めない", "あまり勧めない", "どちらでもない", "勧める", "強く勧める"],
    ),
];

pub fn seeds(mode: SurveyMode) -> &'static [Blueprint] {
    match mode {
        SurveyMode::Screening => &SCREENING_SEEDS,
        SurveyMode::Main => &MAIN_SEEDS,
    }
}

/// Display grouping, assigned round-robin in emission order.
pub const CATEGORY_POOL: [&str; 4] = ["基本事実", "態度・意識", "改善要望", "認知経路"];

pub fn display_category(index: usize) -> &'static str {
    CATEGORY_POOL[index % CATEGORY_POOL.len()]
}

static RATIONALE_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("満足", "KPIの把握が必要なので、5件法でTop2Box/平均を確認する設問を作成"),
        ("推奨|薦め|NPS", "口コミ意向を見たいので、推奨度を段階評価で測る設問を作成"),
        ("購入意向|購入|利用意向", "需要の強さを判断したいので、意向の段階評価設問を作成"),
        ("魅力", "第一印象の強さを把握したいので、魅力度の段階評価設問を作成"),
        ("独自性|差別化", "差別化の認識を確認したいので、独自性の段階評価設問を作成"),
        ("認知|知って", "到達状況を把握したいので、認知有無の単一選択設問を作成"),
        (
            "利用状況|頻度",
            "セグメント分けのため、現状把握（利用状況/頻度）の単一選択設問を作成",
        ),
        ("価格|PSM|高い|安い", "価格印象を確認したいので、価格に関する段階評価/選択設問を作成"),
        (
            "改善|理由|自由記述|ご自由に",
            "具体策を集めたいので、自由記述で理由/改善案を収集する設問を作成",
        ),
        ("年齢|性別|職業|年収", "分析軸の把握が必要なので、基本属性の単一選択設問を作成"),
    ]
    .into_iter()
    .map(|(pattern, rationale)| {
        let re = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid rationale pattern {pattern}: {e}"));
        (re, rationale)
    })
    .collect()
});

/// Designer-facing reason for a question: first keyword hit, else by format.
pub fn rationale_for(text: &str, format: QuestionFormat) -> &'static str {
    RATIONALE_RULES
        .iter()
        .find(|(re, _)| re.is_match(text))
        .map(|(_, rationale)| *rationale)
        .unwrap_or(match format {
            QuestionFormat::SingleSelect => "判断の明確化が必要なので、単一選択の設問を作成",
            QuestionFormat::MultiSelect => "重視点を網羅把握したいので、複数選択の設問を作成",
            QuestionFormat::FivePointScale => "強さの度合いを把握したいので、段階評価の設問を作成",
            QuestionFormat::FreeText | QuestionFormat::Numeric => {
                "具体的な声を集めたいので、自由記述の設問を作成"
            }
        })
}
