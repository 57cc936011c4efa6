//! Survey Catalog Port - templates and past surveys.
//!
//! Both sources are static lists queried by simple predicates; the
//! assistant only needs lookup by id and filtered listing.

use serde::{Deserialize, Serialize};

use crate::domain::survey::{QuestionFormat, SurveyMode};

/// One question of a catalog template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateQuestion {
    pub text: String,
    pub format: QuestionFormat,
    #[serde(default)]
    pub options: Vec<String>,
}

impl TemplateQuestion {
    pub fn new(text: &str, format: QuestionFormat, options: &[&str]) -> Self {
        Self {
            text: text.to_string(),
            format,
            options: options.iter().map(|o| o.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub mode: SurveyMode,
    pub audience: String,
    pub purpose: String,
    pub questions: Vec<TemplateQuestion>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastSurvey {
    pub id: String,
    pub title: String,
    pub description: String,
    pub mode: SurveyMode,
    pub audience: String,
    /// ISO date of the last update.
    pub updated_on: String,
    pub response_count: u32,
}

/// Predicate filter; unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogFilter {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub mode: Option<SurveyMode>,
}

impl CatalogFilter {
    pub fn keyword(keyword: impl Into<String>) -> Self {
        Self {
            keyword: Some(keyword.into()),
            ..Self::default()
        }
    }

    /// True when `title`/`description` contain the keyword and the other
    /// predicates hold.
    pub fn matches(&self, title: &str, description: &str, category: Option<&str>, mode: SurveyMode) -> bool {
        let keyword_ok = self.keyword.as_deref().map(str::trim).map_or(true, |k| {
            k.is_empty() || title.contains(k) || description.contains(k)
        });
        let category_ok = match (&self.category, category) {
            (Some(wanted), Some(actual)) => wanted == actual,
            (Some(_), None) => false,
            (None, _) => true,
        };
        let mode_ok = self.mode.map_or(true, |m| m == mode);
        keyword_ok && category_ok && mode_ok
    }
}

/// Ordering for past surveys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PastSurveySort {
    /// Catalog order.
    #[default]
    Recommended,
    NewestFirst,
}

/// Port for the read-only survey catalog.
pub trait SurveyCatalog: Send + Sync {
    fn template(&self, id: &str) -> Option<SurveyTemplate>;

    fn past_survey(&self, id: &str) -> Option<PastSurvey>;

    fn find_templates(&self, filter: &CatalogFilter) -> Vec<SurveyTemplate>;

    fn find_past_surveys(&self, filter: &CatalogFilter, sort: PastSurveySort) -> Vec<PastSurvey>;
}
