//! Field values: a value plus where it came from and how sure we are.

use serde::{Deserialize, Serialize};

/// Confidence of a follow-up answer typed by the user.
pub const ANSWER_CONFIDENCE: f64 = 1.0;
/// Confidence of a value read from a labeled `key: value` line.
pub const LABELED_CONFIDENCE: f64 = 0.9;
/// Confidence of a keyword hit anywhere in the free text.
pub const WHOLE_TEXT_CONFIDENCE: f64 = 0.6;
/// Confidence of a value derived from another field.
pub const DERIVED_CONFIDENCE: f64 = 0.5;

/// Origin of a field value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldSource {
    User,
    Inferred,
    #[default]
    Empty,
}

impl FieldSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldSource::User => "user",
            FieldSource::Inferred => "inferred",
            FieldSource::Empty => "empty",
        }
    }
}

/// A field's payload: free text or a list of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldContent {
    Text(String),
    List(Vec<String>),
}

impl FieldContent {
    /// True for whitespace-only text or a list without any non-blank entry.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldContent::Text(s) => s.trim().is_empty(),
            FieldContent::List(items) => items.iter().all(|i| i.trim().is_empty()),
        }
    }

    /// Flattens the payload for display, joining lists with `、`.
    pub fn to_text(&self) -> String {
        match self {
            FieldContent::Text(s) => s.clone(),
            FieldContent::List(items) => items.join("、"),
        }
    }
}

impl From<&str> for FieldContent {
    fn from(s: &str) -> Self {
        FieldContent::Text(s.to_string())
    }
}

impl From<String> for FieldContent {
    fn from(s: String) -> Self {
        FieldContent::Text(s)
    }
}

/// One slot of a Requirements document.
///
/// `value` is absent exactly when `source` is `Empty`, and an empty field
/// always has confidence 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldValue {
    pub value: Option<FieldContent>,
    pub source: FieldSource,
    pub confidence: f64,
}

impl FieldValue {
    pub fn empty() -> Self {
        Self {
            value: None,
            source: FieldSource::Empty,
            confidence: 0.0,
        }
    }

    /// A value the user supplied directly.
    pub fn user(value: impl Into<FieldContent>) -> Self {
        Self::new(value, FieldSource::User, ANSWER_CONFIDENCE)
    }

    pub fn inferred(value: impl Into<FieldContent>, confidence: f64) -> Self {
        Self::new(value, FieldSource::Inferred, confidence)
    }

    pub fn new(value: impl Into<FieldContent>, source: FieldSource, confidence: f64) -> Self {
        Self {
            value: Some(value.into()),
            source,
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// Empty means "unknown": no source, or nothing but whitespace.
    pub fn is_empty(&self) -> bool {
        self.source == FieldSource::Empty
            || self.value.as_ref().map_or(true, FieldContent::is_blank)
    }

    /// Display text, if any.
    pub fn text(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        self.value.as_ref().map(FieldContent::to_text)
    }

    /// Checks the empty/value/confidence coupling. Returns the reason on failure.
    pub fn consistency_error(&self) -> Option<&'static str> {
        if !(0.0..=1.0).contains(&self.confidence) || self.confidence.is_nan() {
            return Some("confidence must be within [0, 1]");
        }
        let blank = self.value.as_ref().map_or(true, FieldContent::is_blank);
        match (self.source, blank) {
            (FieldSource::Empty, false) => Some("value must be null when source is empty"),
            (FieldSource::Empty, true) if self.confidence != 0.0 => {
                Some("confidence must be 0 when source is empty")
            }
            (FieldSource::User | FieldSource::Inferred, true) => {
                Some("value is required unless source is empty")
            }
            _ => None,
        }
    }
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::empty()
    }
}

/// Ordering bucket for follow-up and confirmation questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod emptiness {
        use super::*;

        #[test]
        fn default_value_is_empty_with_zero_confidence() {
            let v = FieldValue::default();
            assert!(v.is_empty());
            assert_eq!(v.confidence, 0.0);
            assert_eq!(v.consistency_error(), None);
        }

        #[test]
        fn whitespace_text_counts_as_empty() {
            let v = FieldValue::user("   ");
            assert!(v.is_empty());
            assert!(v.consistency_error().is_some());
        }

        #[test]
        fn list_with_only_blank_items_counts_as_empty() {
            let v = FieldValue::user(FieldContent::List(vec!["".into(), " ".into()]));
            assert!(v.is_empty());
        }
    }

    mod consistency {
        use super::*;

        #[test]
        fn empty_source_with_value_is_inconsistent() {
            let v = FieldValue::new("x", FieldSource::Empty, 0.0);
            assert_eq!(
                v.consistency_error(),
                Some("value must be null when source is empty")
            );
        }

        #[test]
        fn empty_source_with_confidence_is_inconsistent() {
            let v = FieldValue {
                value: None,
                source: FieldSource::Empty,
                confidence: 0.3,
            };
            assert_eq!(
                v.consistency_error(),
                Some("confidence must be 0 when source is empty")
            );
        }

        #[test]
        fn constructor_clamps_confidence() {
            assert_eq!(FieldValue::inferred("x", 4.0).confidence, 1.0);
        }
    }

    #[test]
    fn list_content_joins_for_display() {
        let v = FieldValue::user(FieldContent::List(vec!["A".into(), "B".into()]));
        assert_eq!(v.text().as_deref(), Some("A、B"));
    }

    #[test]
    fn priority_orders_high_first() {
        assert!(Priority::High < Priority::Medium);
        assert!(Priority::Medium < Priority::Low);
    }

    #[test]
    fn field_value_serializes_with_wire_names() {
        let json = serde_json::to_value(FieldValue::inferred("NPS調査", 0.6)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"value": "NPS調査", "source": "inferred", "confidence": 0.6})
        );
    }
}
