//! Named fields of the Requirements document and dotted paths addressing them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The four fields every survey brief must resolve, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RequiredField {
    Title,
    Purpose,
    TargetAudience,
    AnalysisAudience,
}

impl RequiredField {
    pub const ALL: [RequiredField; 4] = [
        RequiredField::Title,
        RequiredField::Purpose,
        RequiredField::TargetAudience,
        RequiredField::AnalysisAudience,
    ];

    /// Wire key inside `required`.
    pub fn key(&self) -> &'static str {
        match self {
            RequiredField::Title => "title",
            RequiredField::Purpose => "purpose",
            RequiredField::TargetAudience => "targetAudience",
            RequiredField::AnalysisAudience => "analysisAudience",
        }
    }

    /// Label shown to the user.
    pub fn label(&self) -> &'static str {
        match self {
            RequiredField::Title => "調査タイトル",
            RequiredField::Purpose => "調査目的",
            RequiredField::TargetAudience => "対象者条件",
            RequiredField::AnalysisAudience => "分析対象者条件",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key || f.label() == key)
    }

    pub fn path(&self) -> FieldPath {
        FieldPath::Required(*self)
    }
}

/// Declared optional fields. The `optional` map stays open to other keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalField {
    ContactTarget,
    CategoryType,
    UsageStyle,
    SelectionReason,
    QuestionType,
    AnswerFormat,
    QuestionStructure,
    BranchCondition,
    AnalysisPerspective,
    Method,
    QuestionCount,
    Tone,
}

impl OptionalField {
    pub const ALL: [OptionalField; 12] = [
        OptionalField::ContactTarget,
        OptionalField::CategoryType,
        OptionalField::UsageStyle,
        OptionalField::SelectionReason,
        OptionalField::QuestionType,
        OptionalField::AnswerFormat,
        OptionalField::QuestionStructure,
        OptionalField::BranchCondition,
        OptionalField::AnalysisPerspective,
        OptionalField::Method,
        OptionalField::QuestionCount,
        OptionalField::Tone,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            OptionalField::ContactTarget => "contactTarget",
            OptionalField::CategoryType => "categoryType",
            OptionalField::UsageStyle => "usageStyle",
            OptionalField::SelectionReason => "selectionReason",
            OptionalField::QuestionType => "questionType",
            OptionalField::AnswerFormat => "answerFormat",
            OptionalField::QuestionStructure => "questionStructure",
            OptionalField::BranchCondition => "branchCondition",
            OptionalField::AnalysisPerspective => "analysisPerspective",
            OptionalField::Method => "method",
            OptionalField::QuestionCount => "questionCount",
            OptionalField::Tone => "tone",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            OptionalField::ContactTarget => "接触対象",
            OptionalField::CategoryType => "カテゴリ種別",
            OptionalField::UsageStyle => "利用形態",
            OptionalField::SelectionReason => "選定理由",
            OptionalField::QuestionType => "設問タイプの希望",
            OptionalField::AnswerFormat => "回答形式の希望",
            OptionalField::QuestionStructure => "設問構成の希望",
            OptionalField::BranchCondition => "分岐条件の希望",
            OptionalField::AnalysisPerspective => "分析観点",
            OptionalField::Method => "調査手法",
            OptionalField::QuestionCount => "設問数",
            OptionalField::Tone => "文体",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.key() == key || f.label() == key)
    }

    /// Declaration rank; keys outside the declared set sort after all of these.
    pub fn rank_of(key: &str) -> usize {
        Self::ALL
            .iter()
            .position(|f| f.key() == key)
            .unwrap_or(Self::ALL.len())
    }

    pub fn path(&self) -> FieldPath {
        FieldPath::Optional(self.key().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldPathError {
    #[error("malformed field path '{0}', expected 'required.<key>' or 'optional.<key>'")]
    Malformed(String),

    #[error("'{0}' is not a required field")]
    UnknownRequired(String),
}

/// Dotted address of one Requirements field, e.g. `required.title`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FieldPath {
    Required(RequiredField),
    Optional(String),
}

impl FieldPath {
    /// Resolves a bare field key or label (`title`, `調査タイトル`, `method`).
    pub fn for_field_name(name: &str) -> Option<Self> {
        let name = name.trim();
        if let Ok(path) = name.parse() {
            return Some(path);
        }
        RequiredField::from_key(name)
            .map(FieldPath::Required)
            .or_else(|| OptionalField::from_key(name).map(|f| f.path()))
    }

    /// Key within its section.
    pub fn key(&self) -> &str {
        match self {
            FieldPath::Required(f) => f.key(),
            FieldPath::Optional(k) => k,
        }
    }

    pub fn is_required(&self) -> bool {
        matches!(self, FieldPath::Required(_))
    }

    /// Label for prompts; undeclared optional keys fall back to the raw key.
    pub fn label(&self) -> &str {
        match self {
            FieldPath::Required(f) => f.label(),
            FieldPath::Optional(k) => OptionalField::from_key(k).map_or(k.as_str(), |f| f.label()),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPath::Required(r) => write!(f, "required.{}", r.key()),
            FieldPath::Optional(k) => write!(f, "optional.{}", k),
        }
    }
}

impl FromStr for FieldPath {
    type Err = FieldPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (section, key) = s
            .split_once('.')
            .ok_or_else(|| FieldPathError::Malformed(s.to_string()))?;
        let key_ok = !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !key_ok {
            return Err(FieldPathError::Malformed(s.to_string()));
        }
        match section {
            "required" => RequiredField::ALL
                .into_iter()
                .find(|f| f.key() == key)
                .map(FieldPath::Required)
                .ok_or_else(|| FieldPathError::UnknownRequired(key.to_string())),
            "optional" => Ok(FieldPath::Optional(key.to_string())),
            _ => Err(FieldPathError::Malformed(s.to_string())),
        }
    }
}

impl TryFrom<String> for FieldPath {
    type Error = FieldPathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldPath> for String {
    fn from(path: FieldPath) -> Self {
        path.to_string()
    }
}
