//! Mock generation adapter for development and tests.
//!
//! - Queued documents or failures per capability, consumed in order
//! - Canned documents when a queue is empty
//! - Simulated latency for timeout and supersede testing
//! - Call tracking
//!
//! ```ignore
//! let adapter = MockGenerationAdapter::new()
//!     .with_failure(Capability::ExtractRequirements, GenerationFailure::Network("reset".into()))
//!     .with_delay(Duration::from_millis(50));
//! ```

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::Timestamp;
use crate::domain::survey::{Requirements, RequiredField};
use crate::ports::{AdapterInfo, Capability, GenerationAdapter, GenerationFailure};

/// One queued reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    Document(Value),
    Failure(GenerationFailure),
}

#[derive(Debug, Clone, Default)]
pub struct MockGenerationAdapter {
    replies: Arc<Mutex<HashMap<Capability, VecDeque<MockReply>>>>,
    calls: Arc<Mutex<Vec<Capability>>>,
    delay: Duration,
}

impl MockGenerationAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a raw document for `capability`. It is still validated by the caller.
    pub fn with_document(self, capability: Capability, document: Value) -> Self {
        self.push(capability, MockReply::Document(document));
        self
    }

    pub fn with_failure(self, capability: Capability, failure: GenerationFailure) -> Self {
        self.push(capability, MockReply::Failure(failure));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self, capability: Capability) -> usize {
        lock(&self.calls).iter().filter(|c| **c == capability).count()
    }

    pub fn calls(&self) -> Vec<Capability> {
        lock(&self.calls).clone()
    }

    fn push(&self, capability: Capability, reply: MockReply) {
        lock(&self.replies)
            .entry(capability)
            .or_default()
            .push_back(reply);
    }

    async fn respond(
        &self,
        capability: Capability,
        canned: impl FnOnce() -> Value,
    ) -> Result<Value, GenerationFailure> {
        lock(&self.calls).push(capability);
        let queued = lock(&self.replies)
            .get_mut(&capability)
            .and_then(VecDeque::pop_front);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        match queued {
            Some(MockReply::Document(doc)) => Ok(doc),
            Some(MockReply::Failure(err)) => Err(err),
            None => Ok(canned()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn meta() -> Value {
    json!({"version": "1.0", "locale": "ja-JP", "generatedAt": Timestamp::now()})
}

fn canned_requirements(input: &str) -> Value {
    let title = if input.contains("顧客満足度") {
        "顧客満足度調査"
    } else if input.contains("従業員満足") || input.contains("ES") {
        "従業員満足度調査"
    } else if input.to_uppercase().contains("NPS") {
        "NPS調査"
    } else {
        "アンケート調査"
    };
    let purpose = if input.contains("顧客満足度") {
        "顧客満足度や改善点の把握"
    } else {
        "調査目的の把握"
    };
    json!({
        "meta": meta(),
        "required": {
            "title": {"value": title, "source": "inferred", "confidence": 0.9},
            "purpose": {"value": purpose, "source": "inferred", "confidence": 0.8},
            "targetAudience": {"value": "関連する利用者", "source": "inferred", "confidence": 0.6},
            "analysisAudience": {"value": null, "source": "empty", "confidence": 0}
        },
        "optional": {
            "analysisPerspective": {"value": ["利用頻度", "年齢"], "source": "inferred", "confidence": 0.5}
        },
        "completionPolicy": {"whenEmpty": "空欄", "whenInferable": "推定値を記入", "notes": []},
        "confirmationQuestions": []
    })
}

fn canned_question_set() -> Value {
    json!({
        "meta": meta(),
        "methodDecomposition": {"screening": "対象抽出", "main": "本調査"},
        "screeningQuestions": [{
            "id": "S1",
            "text": "本テーマの利用経験はありますか？",
            "format": "single-select",
            "internalType": "SA",
            "choices": [
                {"code": "1", "label": "現在利用中"},
                {"code": "2", "label": "過去に利用"},
                {"code": "3", "label": "未利用"}
            ]
        }],
        "mainQuestions": [{
            "id": "Q1",
            "text": "総合満足度を教えてください。",
            "format": "5-point-scale",
            "internalType": "Scale",
            "scale": {"min": 1, "max": 5, "labels": ["非常に不満", "不満", "普通", "満足", "非常に満足"]},
            "analysisPurpose": "KPI把握（平均・Top2Box）"
        }],
        "questionRationale": {"S1": "対象抽出", "Q1": "KPI"},
        "branchRules": [
            {"from": "S1", "when": {"code": "1"}, "goTo": "Q1"},
            {"from": "S1", "else": "END"}
        ],
        "constraints": {"maxScreening": 5, "maxMain": 15, "maxDepth": 2}
    })
}

fn canned_follow_up(requirements: &Requirements) -> Value {
    let has_title = requirements.text_of(RequiredField::Title).is_some();
    if has_title {
        return json!({"meta": meta(), "nextAction": "proceed"});
    }
    json!({
        "meta": meta(),
        "missingFields": ["title"],
        "additionalQuestions": [{
            "id": "mock-title",
            "targetField": "title",
            "path": "required.title",
            "questionText": "この調査のタイトルは何にしますか？",
            "expectedFormat": "text",
            "validation": {"required": true, "min": 2, "max": 60},
            "exampleAnswers": ["顧客満足度調査", "NPS調査"],
            "priority": "high"
        }],
        "fieldMapping": {"required.title": "mock-title"},
        "displayText": "調査設計を進めるために、タイトルを入力してください。",
        "nextAction": "confirm"
    })
}

#[async_trait]
impl GenerationAdapter for MockGenerationAdapter {
    async fn extract_requirements(&self, free_text: &str) -> Result<Value, GenerationFailure> {
        self.respond(Capability::ExtractRequirements, || canned_requirements(free_text))
            .await
    }

    async fn generate_questions(
        &self,
        _requirements: &Requirements,
    ) -> Result<Value, GenerationFailure> {
        self.respond(Capability::GenerateQuestions, canned_question_set)
            .await
    }

    async fn generate_follow_ups(
        &self,
        requirements: &Requirements,
    ) -> Result<Value, GenerationFailure> {
        self.respond(Capability::GenerateFollowUps, || canned_follow_up(requirements))
            .await
    }

    fn adapter_info(&self) -> AdapterInfo {
        AdapterInfo::new("mock", false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::validation::JsonDocumentValidator;
    use crate::ports::DocumentValidator;

    #[tokio::test]
    async fn canned_documents_pass_the_schema_layer() {
        let adapter = MockGenerationAdapter::new();
        let validator = JsonDocumentValidator::new();

        let raw = adapter.extract_requirements("顧客満足度を測りたい").await.unwrap();
        let req = validator.requirements(&raw).unwrap();
        assert_eq!(req.text_of(RequiredField::Title).as_deref(), Some("顧客満足度調査"));

        let raw = adapter.generate_questions(&req).await.unwrap();
        assert_eq!(validator.question_set(&raw).unwrap().question_count(), 2);

        let raw = adapter.generate_follow_ups(&Requirements::empty()).await.unwrap();
        assert_eq!(validator.follow_up(&raw).unwrap().additional_questions.len(), 1);
    }

    #[tokio::test]
    async fn queued_replies_are_consumed_in_order() {
        let adapter = MockGenerationAdapter::new()
            .with_failure(
                Capability::ExtractRequirements,
                GenerationFailure::Network("reset".into()),
            )
            .with_document(Capability::ExtractRequirements, json!({"custom": true}));

        assert!(adapter.extract_requirements("x").await.is_err());
        assert_eq!(
            adapter.extract_requirements("x").await.unwrap(),
            json!({"custom": true})
        );
        // queue drained: canned reply again
        assert!(adapter.extract_requirements("x").await.unwrap().get("required").is_some());
        assert_eq!(adapter.call_count(Capability::ExtractRequirements), 3);
    }

    #[tokio::test]
    async fn queues_are_per_capability() {
        let adapter = MockGenerationAdapter::new().with_failure(
            Capability::GenerateQuestions,
            GenerationFailure::unavailable("down"),
        );
        assert!(adapter.extract_requirements("x").await.is_ok());
        assert!(adapter.generate_questions(&Requirements::empty()).await.is_err());
        assert_eq!(
            adapter.calls(),
            vec![Capability::ExtractRequirements, Capability::GenerateQuestions]
        );
    }
}
