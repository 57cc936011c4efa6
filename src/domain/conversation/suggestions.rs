//! One-click customization intents offered after an edit request.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomizationIntent {
    AddQuestions,
    AddOtherChoice,
    ScaleToSingle,
    PoliteTone,
    AudienceToCustomers,
}

impl CustomizationIntent {
    pub const ALL: [CustomizationIntent; 5] = [
        CustomizationIntent::AddQuestions,
        CustomizationIntent::AddOtherChoice,
        CustomizationIntent::ScaleToSingle,
        CustomizationIntent::PoliteTone,
        CustomizationIntent::AudienceToCustomers,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::AddQuestions => "設問を2問追加",
            Self::AddOtherChoice => "「その他」選択肢を追加",
            Self::ScaleToSingle => "評価尺度を単一選択に",
            Self::PoliteTone => "丁寧な文体に",
            Self::AudienceToCustomers => "対象者を既存顧客に",
        }
    }

    /// Text submitted as a chat message when chosen.
    pub fn message(&self) -> &'static str {
        match self {
            Self::AddQuestions => "設問数を2問増やしてください。",
            Self::AddOtherChoice => "選択肢に「その他（自由記述）」を追加してください。",
            Self::ScaleToSingle => "評価尺度の質問を単一選択に変更してください。",
            Self::PoliteTone => "全体の文言を丁寧語に整えてください。",
            Self::AudienceToCustomers => "対象者を既存顧客にしてください。",
        }
    }

    /// 1-based menu lookup.
    pub fn from_menu_index(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}
