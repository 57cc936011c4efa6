//! The assistant service - the inbound surface the UI drives.
//!
//! One service owns one conversation. New-intent turns take a ticket under the
//! lock, release it across the adapter calls and hand their result back with
//! the ticket's sequence number; a newer turn started in the meantime makes
//! the older result stale and it is dropped. Follow-up answers and catalog
//! selections are applied synchronously under the lock.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::pipeline::GenerationPipeline;
use crate::domain::conversation::{
    replies, Attachment, ConversationError, ConversationView, CustomizationIntent, HandoffDraft,
    IntentResolution, PreviewDocument, SurveyConversation, TurnOutcome, TurnTicket,
};
use crate::domain::survey::{
    clamp_question_count, FieldSource, FieldValue, OptionalField, Requirements, SurveyMode,
    LABELED_CONFIDENCE,
};
use crate::ports::{
    CatalogFilter, DraftStore, DraftStoreError, PastSurvey, PastSurveySort, SurveyCatalog,
    SurveyTemplate, ASSISTANT_DRAFT_KEY,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssistantError {
    #[error(transparent)]
    Conversation(#[from] ConversationError),

    #[error("unknown template: {0}")]
    UnknownTemplate(String),

    #[error("unknown past survey: {0}")]
    UnknownPastSurvey(String),

    #[error("draft store error: {0}")]
    DraftStore(#[from] DraftStoreError),
}

impl AssistantError {
    /// Text safe to show in the chat.
    pub fn to_client_message(&self) -> &'static str {
        match self {
            AssistantError::Conversation(ConversationError::EmptyMessage) => {
                "メッセージを入力してください。"
            }
            AssistantError::Conversation(ConversationError::AlreadyConfirmed) => {
                "この調査は確定済みです。"
            }
            AssistantError::Conversation(ConversationError::NoPreview) => {
                "表示中のプレビューがありません。"
            }
            AssistantError::Conversation(_) => "今はその操作を行えません。",
            AssistantError::UnknownTemplate(_) => "指定されたテンプレートが見つかりません。",
            AssistantError::UnknownPastSurvey(_) => "指定された過去の調査が見つかりません。",
            AssistantError::DraftStore(_) => {
                "下書きを保存できませんでした。もう一度お試しください。"
            }
        }
    }
}

/// Applies a relative count change on top of the best known base count.
///
/// The base is the brief's own count, then the count of the preview on
/// screen, then the mode default.
pub fn apply_count_adjustment(
    requirements: &mut Requirements,
    delta: i64,
    preview_count: Option<usize>,
) -> usize {
    let base = requirements
        .question_count()
        .or(preview_count)
        .unwrap_or_else(|| {
            requirements
                .survey_mode()
                .unwrap_or(SurveyMode::Main)
                .default_question_count()
        });
    let count = clamp_question_count((base as i64).saturating_add(delta));
    requirements.set_optional(
        OptionalField::QuestionCount,
        FieldValue::new(count.to_string(), FieldSource::User, LABELED_CONFIDENCE),
    );
    count
}

#[derive(Clone)]
pub struct AssistantService {
    conversation: Arc<Mutex<SurveyConversation>>,
    pipeline: Arc<GenerationPipeline>,
    catalog: Arc<dyn SurveyCatalog>,
    drafts: Arc<dyn DraftStore>,
}

impl AssistantService {
    pub fn new(
        pipeline: Arc<GenerationPipeline>,
        catalog: Arc<dyn SurveyCatalog>,
        drafts: Arc<dyn DraftStore>,
    ) -> Self {
        Self {
            conversation: Arc::new(Mutex::new(SurveyConversation::new())),
            pipeline,
            catalog,
            drafts,
        }
    }

    // === Chat ===

    /// Handles one chat message.
    ///
    /// While a follow-up is outstanding the message is its answer; otherwise
    /// it is new intent and runs extraction.
    pub async fn submit_user_message(
        &self,
        text: &str,
        attachments: Vec<Attachment>,
    ) -> Result<TurnOutcome, AssistantError> {
        let ticket = {
            let mut conversation = self.conversation.lock().await;
            if conversation.current_follow_up().is_some() {
                return Ok(conversation.answer_follow_up(text)?);
            }
            conversation.begin_turn(text, attachments)?
        };
        self.run_intent_turn(ticket).await
    }

    pub async fn submit_follow_up_answer(&self, text: &str) -> Result<TurnOutcome, AssistantError> {
        let mut conversation = self.conversation.lock().await;
        Ok(conversation.answer_follow_up(text)?)
    }

    /// Accepts the proposal and generates the preview.
    pub async fn accept_proceed(&self) -> Result<TurnOutcome, AssistantError> {
        let ticket = self.conversation.lock().await.begin_generation()?;
        let generated = self.pipeline.generate_questions(&ticket.prior).await;
        let mut conversation = self.conversation.lock().await;
        Ok(conversation.complete_generation(ticket.seq, generated)?)
    }

    pub async fn continue_refining(&self) -> Result<(), AssistantError> {
        Ok(self.conversation.lock().await.continue_refining()?)
    }

    /// Submits a customization suggestion exactly like typed text.
    pub async fn choose_suggestion(
        &self,
        intent: CustomizationIntent,
    ) -> Result<TurnOutcome, AssistantError> {
        self.submit_user_message(intent.message(), Vec::new()).await
    }

    // === Catalog ===

    pub fn list_templates(&self, filter: &CatalogFilter) -> Vec<SurveyTemplate> {
        self.catalog.find_templates(filter)
    }

    pub fn list_past_surveys(&self, filter: &CatalogFilter, sort: PastSurveySort) -> Vec<PastSurvey> {
        self.catalog.find_past_surveys(filter, sort)
    }

    pub async fn select_template(&self, template_id: &str) -> Result<PreviewDocument, AssistantError> {
        let template = self
            .catalog
            .template(template_id)
            .ok_or_else(|| AssistantError::UnknownTemplate(template_id.to_string()))?;
        let message = replies::template_selected(&template.title);
        let mut conversation = self.conversation.lock().await;
        Ok(conversation.show_preview(PreviewDocument::from_template(&template), message)?)
    }

    pub async fn select_past_survey(&self, survey_id: &str) -> Result<PreviewDocument, AssistantError> {
        let survey = self
            .catalog
            .past_survey(survey_id)
            .ok_or_else(|| AssistantError::UnknownPastSurvey(survey_id.to_string()))?;
        let message = replies::past_survey_selected(&survey.title);
        let mut conversation = self.conversation.lock().await;
        Ok(conversation.show_preview(PreviewDocument::from_past_survey(&survey), message)?)
    }

    // === Preview ===

    /// Seeds the current preview back into the chat. Returns the seed text.
    pub async fn request_edit(&self) -> Result<String, AssistantError> {
        Ok(self.conversation.lock().await.request_edit()?)
    }

    /// Stores the hand-off draft and freezes the conversation.
    ///
    /// The conversation stays in Previewing when the store fails, so the
    /// user can retry.
    pub async fn confirm_preview(&self) -> Result<HandoffDraft, AssistantError> {
        let mut conversation = self.conversation.lock().await;
        let draft = conversation.prepare_handoff()?;
        self.drafts.put(ASSISTANT_DRAFT_KEY, &draft).await?;
        conversation.mark_confirmed()?;
        info!(
            conversation_id = %conversation.id(),
            title = %draft.title,
            questions = draft.questions.len(),
            "survey draft handed off"
        );
        Ok(draft)
    }

    // === Queries ===

    pub async fn view(&self) -> ConversationView {
        self.conversation.lock().await.view()
    }

    /// Snapshot of the brief as it stands.
    pub async fn requirements(&self) -> Requirements {
        self.conversation.lock().await.requirements().clone()
    }

    pub fn adapter_name(&self) -> String {
        self.pipeline.adapter_name()
    }

    // === Internals ===

    async fn run_intent_turn(&self, ticket: TurnTicket) -> Result<TurnOutcome, AssistantError> {
        let extraction = self.pipeline.extract(&ticket.text).await;
        let mut requirements = ticket.prior.merge(&extraction.requirements);
        if let Some(delta) = extraction.count_adjustment {
            let count = apply_count_adjustment(&mut requirements, delta, ticket.preview_count);
            debug!(delta, count, "applied relative question count");
        }

        let plan = self.pipeline.plan_follow_ups(&requirements).await;
        let resolution = if plan.has_questions() {
            IntentResolution::FollowUp(plan)
        } else {
            match self.pipeline.generate_questions(&requirements).await {
                Some(set) => IntentResolution::Generated(set),
                None => IntentResolution::GenerationFailed,
            }
        };

        let mut conversation = self.conversation.lock().await;
        Ok(conversation.complete_intent_turn(ticket.seq, requirements, resolution)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{
        InMemoryDraftStore, JsonDocumentValidator, OfflineGenerationAdapter, StaticSurveyCatalog,
    };
    use crate::domain::conversation::AssistantPhase;
    use crate::domain::survey::RequiredField;

    fn service_with_store() -> (AssistantService, Arc<InMemoryDraftStore>) {
        let pipeline = GenerationPipeline::new(
            Arc::new(OfflineGenerationAdapter::new()),
            Arc::new(JsonDocumentValidator::new()),
        );
        let store = Arc::new(InMemoryDraftStore::new());
        let service = AssistantService::new(
            Arc::new(pipeline),
            Arc::new(StaticSurveyCatalog::new()),
            store.clone(),
        );
        (service, store)
    }

    fn service() -> AssistantService {
        service_with_store().0
    }

    mod count_adjustment {
        use super::*;

        #[test]
        fn adds_to_the_briefs_own_count() {
            let mut req = Requirements::empty();
            req.set_optional(OptionalField::QuestionCount, FieldValue::user("3"));
            assert_eq!(apply_count_adjustment(&mut req, 2, Some(10)), 5);
            assert_eq!(req.question_count(), Some(5));
        }

        #[test]
        fn falls_back_to_preview_then_mode_default() {
            let mut req = Requirements::empty();
            assert_eq!(apply_count_adjustment(&mut req.clone(), 2, Some(4)), 6);
            assert_eq!(apply_count_adjustment(&mut req, -1, None), 4);
        }

        #[test]
        fn result_is_clamped() {
            let mut req = Requirements::empty();
            assert_eq!(apply_count_adjustment(&mut req, -9, Some(3)), 1);
        }

        #[test]
        fn extreme_deltas_saturate() {
            let mut req = Requirements::empty();
            assert_eq!(apply_count_adjustment(&mut req.clone(), i64::MAX, Some(3)), 20);
            assert_eq!(apply_count_adjustment(&mut req, i64::MIN, Some(3)), 1);
        }
    }

    mod turns {
        use super::*;

        #[tokio::test]
        async fn complete_brief_goes_straight_to_preview() {
            let outcome = service()
                .submit_user_message("テーマ: NPS調査\n手法: 本調査\n設問数: 3問\n対象者: 既存顧客", vec![])
                .await
                .unwrap();
            match outcome {
                TurnOutcome::Previewed(preview) => assert_eq!(preview.question_count(), 3),
                other => panic!("expected preview, got {:?}", other),
            }
        }

        #[tokio::test]
        async fn messages_answer_the_open_follow_up() {
            let service = service();
            let first = service
                .submit_user_message("従業員満足度を知りたい", vec![])
                .await
                .unwrap();
            assert!(matches!(first, TurnOutcome::Asked(_)));

            let second = service.submit_user_message("正社員", vec![]).await.unwrap();
            assert!(matches!(second, TurnOutcome::Asked(q) if q.id == "depth-analysisAudience"));
            service.submit_user_message("人事部", vec![]).await.unwrap();
            let view = service.view().await;
            assert_eq!(view.phase, AssistantPhase::Proposing);
            assert_eq!(
                service.requirements().await.text_of(RequiredField::TargetAudience).as_deref(),
                Some("正社員")
            );
        }

        #[tokio::test]
        async fn huge_relative_count_is_clamped() {
            let service = service();
            let outcome = service
                .submit_user_message(
                    "テーマ: NPS調査\n手法: 本調査\n設問数: 3問\n対象者: 既存顧客\n9223372036854775807問増やして",
                    vec![],
                )
                .await
                .unwrap();
            match outcome {
                TurnOutcome::Previewed(preview) => assert_eq!(preview.question_count(), 20),
                other => panic!("expected preview, got {:?}", other),
            }
            assert!(!service.view().await.awaiting_response);
        }

        #[tokio::test]
        async fn empty_message_is_rejected() {
            let err = service().submit_user_message("  ", vec![]).await.unwrap_err();
            assert_eq!(err.to_client_message(), "メッセージを入力してください。");
        }
    }

    mod catalog {
        use super::*;

        #[tokio::test]
        async fn unknown_ids_are_reported() {
            let service = service();
            assert!(matches!(
                service.select_template("nope").await,
                Err(AssistantError::UnknownTemplate(_))
            ));
            assert!(matches!(
                service.select_past_survey("nope").await,
                Err(AssistantError::UnknownPastSurvey(_))
            ));
        }

        #[tokio::test]
        async fn confirming_a_template_stores_the_draft() {
            let (service, store) = service_with_store();
            service.select_template("customer-satisfaction").await.unwrap();
            let draft = service.confirm_preview().await.unwrap();

            assert_eq!(store.get(ASSISTANT_DRAFT_KEY).await.unwrap(), Some(draft));
            assert_eq!(service.view().await.phase, AssistantPhase::Confirmed);
            assert!(matches!(
                service.submit_user_message("もう一度", vec![]).await,
                Err(AssistantError::Conversation(ConversationError::AlreadyConfirmed))
            ));
        }
    }
}
