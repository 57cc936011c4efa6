//! Built-in template catalog and past-survey list.

use once_cell::sync::Lazy;

use crate::domain::survey::SurveyMode;
use crate::ports::{
    CatalogFilter, PastSurvey, PastSurveySort, SurveyCatalog, SurveyTemplate, TemplateQuestion,
};

use crate::domain::survey::QuestionFormat::{
    FivePointScale as Scale, FreeText as Text, MultiSelect as Multi, SingleSelect as Single,
};

const AGE_BANDS: [&str; 5] = ["18-29歳", "30-39歳", "40-49歳", "50-59歳", "60歳以上"];
const SATISFACTION: [&str; 5] = ["非常に不満", "不満", "普通", "満足", "非常に満足"];
const QUALITY: [&str; 5] = ["非常に悪い", "悪い", "普通", "良い", "非常に良い"];

static TEMPLATES: Lazy<Vec<SurveyTemplate>> = Lazy::new(|| {
    vec![
        template(
            "product-awareness",
            "商品認知度調査",
            "この商品を知っているか、どこで知ったかを確認",
            "認知・認識調査",
            "一般消費者（18-65歳）",
            vec![
                TemplateQuestion::new("以下の商品をご存知ですか？", Single, &["知っている", "聞いたことがある", "知らない"]),
                TemplateQuestion::new(
                    "どちらでこの商品を知りましたか？（複数選択可）",
                    Multi,
                    &["テレビCM", "インターネット広告", "店頭", "友人・知人", "SNS", "その他"],
                ),
                TemplateQuestion::new(
                    "この商品に対する興味度を教えてください",
                    Scale,
                    &["全く興味がない", "興味がない", "どちらでもない", "興味がある", "とても興味がある"],
                ),
                TemplateQuestion::new("あなたの年齢を教えてください", Single, &AGE_BANDS),
            ],
        ),
        template(
            "customer-satisfaction",
            "顧客満足度（CS調査）",
            "商品やサービスの満足度、改善点を確認",
            "満足度・評価調査",
            "既存顧客・サービス利用者",
            vec![
                TemplateQuestion::new("当サービスの総合満足度を教えてください", Scale, &SATISFACTION),
                TemplateQuestion::new("商品の品質についてはいかがですか？", Scale, &QUALITY),
                TemplateQuestion::new("カスタマーサポートの対応はいかがでしたか？", Scale, &QUALITY),
                TemplateQuestion::new("改善してほしい点があれば、具体的にお聞かせください", Text, &[]),
                TemplateQuestion::new(
                    "今後も継続してご利用いただけますか？",
                    Single,
                    &["必ず利用する", "おそらく利用する", "わからない", "おそらく利用しない", "利用しない"],
                ),
                TemplateQuestion::new("あなたの性別を教えてください", Single, &["男性", "女性", "その他", "回答しない"]),
            ],
        ),
        template(
            "employee-satisfaction",
            "従業員満足度（ES調査）",
            "社内制度や働きやすさを評価",
            "満足度・評価調査",
            "全従業員",
            vec![
                TemplateQuestion::new("現在の職場環境についてどのように感じていますか？", Scale, &QUALITY),
                TemplateQuestion::new("職場全体への満足度を教えてください", Scale, &SATISFACTION),
                TemplateQuestion::new(
                    "満足している制度を教えてください（複数選択可）",
                    Multi,
                    &["評価制度", "福利厚生", "研修制度", "休暇制度", "その他"],
                ),
                TemplateQuestion::new(
                    "今後もこの職場で働き続けたいと思いますか？",
                    Single,
                    &["強くそう思う", "そう思う", "どちらでもない", "そう思わない", "全くそう思わない"],
                ),
                TemplateQuestion::new("職場の改善点があれば自由にお書きください", Text, &[]),
            ],
        ),
        template(
            "purchase-behavior",
            "購買行動調査",
            "購入場所、購入頻度、支払方法などを把握",
            "利用実態・行動調査",
            "商品購入経験者",
            vec![
                TemplateQuestion::new(
                    "最も頻繁に購入する場所はどちらですか？",
                    Single,
                    &["実店舗（スーパー）", "実店舗（専門店）", "オンラインショップ", "コンビニ", "その他"],
                ),
                TemplateQuestion::new(
                    "購入頻度を教えてください",
                    Single,
                    &["週1回以上", "月2-3回", "月1回", "2-3ヶ月に1回", "半年に1回以下"],
                ),
                TemplateQuestion::new(
                    "購入時に重視する点は何ですか？（複数選択可）",
                    Multi,
                    &["価格", "品質", "ブランド", "利便性", "デザイン", "口コミ・評判"],
                ),
                TemplateQuestion::new(
                    "現在の価格についてどう思いますか？",
                    Scale,
                    &["高すぎる", "やや高い", "適正", "やや安い", "安すぎる"],
                ),
                TemplateQuestion::new(
                    "あなたの年収を教えてください",
                    Single,
                    &["300万円未満", "300-500万円", "500-700万円", "700-1000万円", "1000万円以上"],
                ),
            ],
        ),
        template(
            "concept-evaluation",
            "新商品コンセプト評価",
            "新商品の魅力・購入意向・独自性をコンパクトに確認",
            "新商品・サービス調査",
            "ターゲット顧客層",
            vec![
                TemplateQuestion::new(
                    "このコンセプトの魅力度を教えてください",
                    Scale,
                    &["全く魅力的でない", "魅力的でない", "どちらでもない", "魅力的", "非常に魅力的"],
                ),
                TemplateQuestion::new(
                    "購入意向はいかがですか？",
                    Scale,
                    &["絶対に購入しない", "購入しない", "どちらでもない", "購入する", "絶対に購入する"],
                ),
                TemplateQuestion::new(
                    "このコンセプトの独自性をどう評価しますか？",
                    Scale,
                    &["全く独自性がない", "独自性がない", "どちらでもない", "独自性がある", "非常に独自性がある"],
                ),
                TemplateQuestion::new("このコンセプトで気になる点や改善提案があれば教えてください", Text, &[]),
                TemplateQuestion::new(
                    "あなたの職業を教えてください",
                    Single,
                    &["会社員", "公務員", "自営業", "学生", "主婦・主夫", "その他"],
                ),
            ],
        ),
    ]
});

static PAST_SURVEYS: Lazy<Vec<PastSurvey>> = Lazy::new(|| {
    vec![
        past("sv-001", "2024年Q4 顧客満足度調査", "満足度／改善点の定点観測", SurveyMode::Main, "既存顧客", "2024-12-18", 1240),
        past("sv-002", "ブランド認知度調査（秋）", "認知経路と想起の把握", SurveyMode::Screening, "一般消費者", "2024-10-02", 3100),
        past("sv-003", "サービス体験評価（サポート）", "サポート品質の評価", SurveyMode::Main, "ユーザー", "2024-08-15", 512),
        past("sv-004", "NPS調査（年次）", "推奨度と理由", SurveyMode::Main, "会員", "2024-05-30", 860),
    ]
});

fn template(
    id: &str,
    title: &str,
    description: &str,
    category: &str,
    audience: &str,
    questions: Vec<TemplateQuestion>,
) -> SurveyTemplate {
    SurveyTemplate {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        category: category.to_string(),
        mode: SurveyMode::Main,
        audience: audience.to_string(),
        purpose: format!("{}ための調査です。", description),
        questions,
    }
}

fn past(
    id: &str,
    title: &str,
    description: &str,
    mode: SurveyMode,
    audience: &str,
    updated_on: &str,
    response_count: u32,
) -> PastSurvey {
    PastSurvey {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        mode,
        audience: audience.to_string(),
        updated_on: updated_on.to_string(),
        response_count,
    }
}

/// Read-only catalog backed by built-in data.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticSurveyCatalog;

impl StaticSurveyCatalog {
    pub fn new() -> Self {
        Self
    }
}

impl SurveyCatalog for StaticSurveyCatalog {
    fn template(&self, id: &str) -> Option<SurveyTemplate> {
        TEMPLATES.iter().find(|t| t.id == id).cloned()
    }

    fn past_survey(&self, id: &str) -> Option<PastSurvey> {
        PAST_SURVEYS.iter().find(|s| s.id == id).cloned()
    }

    fn find_templates(&self, filter: &CatalogFilter) -> Vec<SurveyTemplate> {
        TEMPLATES
            .iter()
            .filter(|t| filter.matches(&t.title, &t.description, Some(&t.category), t.mode))
            .cloned()
            .collect()
    }

    fn find_past_surveys(&self, filter: &CatalogFilter, sort: PastSurveySort) -> Vec<PastSurvey> {
        let mut found: Vec<PastSurvey> = PAST_SURVEYS
            .iter()
            .filter(|s| filter.matches(&s.title, &s.description, None, s.mode))
            .cloned()
            .collect();
        if sort == PastSurveySort::NewestFirst {
            // ISO dates sort lexically
            found.sort_by(|a, b| b.updated_on.cmp(&a.updated_on));
        }
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_templates_and_surveys_by_id() {
        let catalog = StaticSurveyCatalog::new();
        assert_eq!(
            catalog.template("customer-satisfaction").unwrap().audience,
            "既存顧客・サービス利用者"
        );
        assert_eq!(catalog.past_survey("sv-004").unwrap().title, "NPS調査（年次）");
        assert!(catalog.template("nope").is_none());
    }

    #[test]
    fn keyword_filter_narrows_templates() {
        let found = StaticSurveyCatalog::new().find_templates(&CatalogFilter::keyword("満足度"));
        let ids: Vec<&str> = found.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["customer-satisfaction", "employee-satisfaction"]);
    }

    #[test]
    fn past_surveys_sort_newest_first() {
        let found = StaticSurveyCatalog::new()
            .find_past_surveys(&CatalogFilter::default(), PastSurveySort::NewestFirst);
        assert_eq!(found.first().unwrap().id, "sv-001");
        assert_eq!(found.last().unwrap().id, "sv-004");
    }

    #[test]
    fn mode_filter_applies_to_past_surveys() {
        let filter = CatalogFilter {
            mode: Some(SurveyMode::Screening),
            ..Default::default()
        };
        let found = StaticSurveyCatalog::new().find_past_surveys(&filter, PastSurveySort::Recommended);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "sv-002");
    }
}
