//! End-to-end conversations driven through `AssistantService`.
//!
//! Uses the offline and mock adapters with the in-memory collaborators, so no
//! network is involved.

use std::sync::Arc;
use std::time::Duration;

use survey_assistant::adapters::{
    InMemoryDraftStore, JsonDocumentValidator, MockGenerationAdapter, OfflineGenerationAdapter,
    StaticSurveyCatalog,
};
use survey_assistant::application::{AssistantService, GenerationPipeline};
use survey_assistant::domain::conversation::{
    AssistantPhase, ChatRole, CustomizationIntent, TurnOutcome, PreviewOrigin,
};
use survey_assistant::domain::generation::{tables, QuestionGenerator, OTHER_CHOICE_LABEL};
use survey_assistant::domain::survey::{
    AudienceCategory, FieldSource, FieldValue, OptionalField, QuestionFormat, RequiredField,
    Requirements, SurveyMode, LABELED_CONFIDENCE,
};
use survey_assistant::ports::{
    Capability, DraftStore, GenerationAdapter, GenerationFailure, ASSISTANT_DRAFT_KEY,
};

const LABELED_BRIEF: &str = "テーマ: NPS調査\n手法: 本調査\n設問数: 3問\n対象者: 既存顧客";

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Harness {
    service: AssistantService,
    store: Arc<InMemoryDraftStore>,
}

fn harness(adapter: Arc<dyn GenerationAdapter>) -> Harness {
    let pipeline = GenerationPipeline::new(adapter, Arc::new(JsonDocumentValidator::new()))
        .with_timeout(Duration::from_secs(2));
    let store = Arc::new(InMemoryDraftStore::new());
    let service = AssistantService::new(
        Arc::new(pipeline),
        Arc::new(StaticSurveyCatalog::new()),
        store.clone(),
    );
    Harness { service, store }
}

fn offline() -> Harness {
    harness(Arc::new(OfflineGenerationAdapter::new()))
}

// =============================================================================
// Scenarios
// =============================================================================

#[tokio::test]
async fn labeled_brief_is_complete_and_generates_exactly_three_questions() {
    let h = offline();
    let outcome = h.service.submit_user_message(LABELED_BRIEF, vec![]).await.unwrap();

    let req = h.service.requirements().await;
    assert_eq!(req.text_of(RequiredField::Title).as_deref(), Some("NPS調査"));
    assert_eq!(req.survey_mode(), Some(SurveyMode::Main));
    assert_eq!(req.question_count(), Some(3));
    assert_eq!(
        req.text_of(RequiredField::TargetAudience).as_deref(),
        Some(AudienceCategory::Customer.label())
    );
    for field in [RequiredField::Title, RequiredField::TargetAudience] {
        assert_eq!(req.required.get(field).source, FieldSource::User);
    }
    assert!(req.missing_required().is_empty());

    let TurnOutcome::Previewed(preview) = outcome else {
        panic!("expected a preview, got {:?}", outcome);
    };
    assert_eq!(preview.mode, SurveyMode::Main);
    let ids: Vec<_> = preview.questions.iter().map(|q| q.id.as_str()).collect();
    assert_eq!(ids, vec!["Q1", "Q2", "Q3"]);
    assert!(preview.questions.iter().all(|q| !q.rationale.is_empty()));
}

#[tokio::test]
async fn theme_only_brief_asks_for_the_next_required_gap() {
    let h = offline();
    let outcome = h
        .service
        .submit_user_message("従業員満足度を知りたい", vec![])
        .await
        .unwrap();

    let req = h.service.requirements().await;
    let title = &req.required.title;
    assert!(title.text().unwrap_or_default().contains("従業員満足"));
    assert_eq!(title.source, FieldSource::Inferred);
    assert!(title.confidence < LABELED_CONFIDENCE);
    assert_eq!(req.survey_mode(), None);
    assert_eq!(req.question_count(), None);
    assert!(req.required.target_audience.is_empty());

    let TurnOutcome::Asked(question) = outcome else {
        panic!("expected a follow-up, got {:?}", outcome);
    };
    assert_eq!(question.path, RequiredField::TargetAudience.path());

    let view = h.service.view().await;
    assert_eq!(view.phase, AssistantPhase::FollowingUp);
    assert_eq!(view.follow_up_prompt, Some(question));
}

#[test]
fn short_seed_list_is_padded_from_the_first_supplementary_pattern() {
    let mut req = Requirements::empty();
    req.set_optional(OptionalField::Method, FieldValue::user("screening"));
    req.set_optional(OptionalField::QuestionCount, FieldValue::user("5"));
    req.required.title = FieldValue::user("NPS調査");

    let set = QuestionGenerator::new().generate(&req);
    assert_eq!(set.screening_questions.len(), 5);
    assert_eq!(
        set.screening_questions[3].text,
        tables::SUPPLEMENTARY_PATTERNS[0].render("NPS調査")
    );
    assert_eq!(
        set.screening_questions[4].text,
        tables::SUPPLEMENTARY_PATTERNS[1].render("NPS調査")
    );
}

#[tokio::test]
async fn failing_extraction_completes_the_turn_locally() {
    let adapter = MockGenerationAdapter::new().with_failure(
        Capability::ExtractRequirements,
        GenerationFailure::Network("connection refused".into()),
    );
    let h = harness(Arc::new(adapter.clone()));

    let outcome = h.service.submit_user_message(LABELED_BRIEF, vec![]).await.unwrap();
    assert!(matches!(outcome, TurnOutcome::Previewed(_)));
    assert_eq!(adapter.call_count(Capability::ExtractRequirements), 1);

    let req = h.service.requirements().await;
    assert_eq!(req.required.title.source, FieldSource::User);

    let view = h.service.view().await;
    let reply = view
        .entries
        .iter()
        .rev()
        .find(|e| e.role == ChatRole::Assistant)
        .unwrap();
    assert!(!reply.text.contains("connection refused"));
    assert!(!reply.text.to_lowercase().contains("error"));
    assert!(!view.awaiting_response);
}

// =============================================================================
// Turn sequencing
// =============================================================================

#[tokio::test]
async fn newer_message_supersedes_a_turn_in_flight() {
    let adapter = MockGenerationAdapter::new().with_delay(Duration::from_millis(60));
    let h = harness(Arc::new(adapter));

    let first = {
        let service = h.service.clone();
        tokio::spawn(async move { service.submit_user_message("NPSを知りたい", vec![]).await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(h.service.view().await.awaiting_response);

    let second = h
        .service
        .submit_user_message("顧客満足度を知りたい", vec![])
        .await
        .unwrap();
    let first = first.await.unwrap().unwrap();

    assert_eq!(first, TurnOutcome::Superseded);
    assert_ne!(second, TurnOutcome::Superseded);
    let req = h.service.requirements().await;
    assert_eq!(req.text_of(RequiredField::Title).as_deref(), Some("顧客満足度調査"));
}

#[tokio::test]
async fn follow_up_answers_are_never_re_extracted() {
    let h = offline();
    h.service
        .submit_user_message("従業員満足度を知りたい", vec![])
        .await
        .unwrap();

    // Looks like a new brief, but is taken verbatim as the audience answer.
    h.service.submit_user_message("テーマ: NPS調査", vec![]).await.unwrap();
    let req = h.service.requirements().await;
    assert_eq!(
        req.text_of(RequiredField::TargetAudience).as_deref(),
        Some("テーマ: NPS調査")
    );
    assert!(req.text_of(RequiredField::Title).unwrap_or_default().contains("従業員満足"));
}

#[tokio::test]
async fn drained_queue_offers_proceed_then_previews() {
    let h = offline();
    h.service
        .submit_user_message("従業員満足度を知りたい", vec![])
        .await
        .unwrap();
    h.service.submit_user_message("正社員", vec![]).await.unwrap();
    let outcome = h.service.submit_follow_up_answer("人事部").await.unwrap();

    let TurnOutcome::Proposed(offer) = outcome else {
        panic!("expected a proposal, got {:?}", outcome);
    };
    assert!(!offer.missing_optional.is_empty());

    let outcome = h.service.accept_proceed().await.unwrap();
    let TurnOutcome::Previewed(preview) = outcome else {
        panic!("expected a preview, got {:?}", outcome);
    };
    assert_eq!(preview.question_count(), SurveyMode::Main.default_question_count());
}

#[tokio::test]
async fn refining_returns_to_free_chat() {
    let h = offline();
    h.service
        .submit_user_message("従業員満足度を知りたい", vec![])
        .await
        .unwrap();
    h.service.submit_user_message("正社員", vec![]).await.unwrap();
    h.service.submit_user_message("人事部", vec![]).await.unwrap();

    h.service.continue_refining().await.unwrap();
    assert_eq!(h.service.view().await.phase, AssistantPhase::Idle);

    let outcome = h
        .service
        .submit_user_message("手法: 事前調査\n設問数: 4", vec![])
        .await
        .unwrap();
    let TurnOutcome::Previewed(preview) = outcome else {
        panic!("expected a preview, got {:?}", outcome);
    };
    assert_eq!(preview.mode, SurveyMode::Screening);
    assert_eq!(preview.question_count(), 4);
}

// =============================================================================
// Templates, edits and hand-off
// =============================================================================

#[tokio::test]
async fn template_edit_customize_and_confirm() {
    let h = offline();
    let preview = h.service.select_template("customer-satisfaction").await.unwrap();
    assert_eq!(preview.origin, PreviewOrigin::Template { id: "customer-satisfaction".into() });
    let base_count = preview.question_count();

    let seed = h.service.request_edit().await.unwrap();
    assert!(seed.contains(&preview.title));
    let view = h.service.view().await;
    assert_eq!(view.phase, AssistantPhase::EditRequested);
    assert_eq!(view.suggestions.len(), CustomizationIntent::ALL.len());

    let outcome = h
        .service
        .choose_suggestion(CustomizationIntent::AddQuestions)
        .await
        .unwrap();
    let TurnOutcome::Previewed(longer) = outcome else {
        panic!("expected a preview, got {:?}", outcome);
    };
    assert_eq!(longer.question_count(), base_count + 2);

    let outcome = h
        .service
        .choose_suggestion(CustomizationIntent::AddOtherChoice)
        .await
        .unwrap();
    let TurnOutcome::Previewed(with_other) = outcome else {
        panic!("expected a preview, got {:?}", outcome);
    };
    assert_eq!(with_other.question_count(), base_count + 2);
    for q in with_other.questions.iter().filter(|q| q.format.has_choices()) {
        assert!(q.options.iter().any(|o| o == OTHER_CHOICE_LABEL), "{}", q.text);
    }

    let draft = h.service.confirm_preview().await.unwrap();
    assert_eq!(draft.survey_type, SurveyMode::Main);
    assert_eq!(draft.questions.len(), base_count + 2);
    assert_eq!(draft.questions[0].id, "Q1");

    let stored = h.store.get(ASSISTANT_DRAFT_KEY).await.unwrap();
    assert_eq!(stored, Some(draft));
    let raw = h.store.raw(ASSISTANT_DRAFT_KEY).await.unwrap();
    assert!(raw.contains("\"type\":\"main\""));
    assert_eq!(h.service.view().await.phase, AssistantPhase::Confirmed);
}

#[tokio::test]
async fn scale_to_single_turns_scales_into_choices() {
    let h = offline();
    h.service.submit_user_message(LABELED_BRIEF, vec![]).await.unwrap();
    h.service.request_edit().await.unwrap();
    let outcome = h
        .service
        .choose_suggestion(CustomizationIntent::ScaleToSingle)
        .await
        .unwrap();
    let TurnOutcome::Previewed(preview) = outcome else {
        panic!("expected a preview, got {:?}", outcome);
    };
    assert!(preview
        .questions
        .iter()
        .all(|q| q.format != QuestionFormat::FivePointScale));
}

#[tokio::test]
async fn past_survey_preview_can_be_confirmed() {
    let h = offline();
    let preview = h.service.select_past_survey("sv-002").await.unwrap();
    assert_eq!(preview.mode, SurveyMode::Screening);

    let draft = h.service.confirm_preview().await.unwrap();
    assert_eq!(draft.survey_type, SurveyMode::Screening);
    assert_eq!(draft.questions.len(), preview.question_count());
}
