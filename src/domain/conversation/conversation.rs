//! The conversation aggregate.
//!
//! Owns every piece of per-conversation state: the chat log, the current
//! Requirements, the follow-up queue and the preview. All transitions are
//! synchronous; the service layer runs the asynchronous stages between a
//! `begin_*` and the matching `complete_*` call and hands the results back
//! with the turn sequence number it was given.

use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use super::chat::{Attachment, ChatEntry};
use super::phase::AssistantPhase;
use super::preview::{HandoffDraft, PreviewDocument, EMPTY_STATE_MESSAGE};
use super::replies;
use super::suggestions::CustomizationIntent;
use crate::domain::depth::{DepthEngine, DepthError, DepthState, FollowUpQueue};
use crate::domain::extraction::LocalExtractor;
use crate::domain::foundation::{ConversationId, StateMachine, Timestamp, ValidationError};
use crate::domain::survey::{FollowUp, FollowUpQuestion, QuestionSet, Requirements};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversationError {
    #[error("message must not be empty")]
    EmptyMessage,

    #[error("conversation is already confirmed")]
    AlreadyConfirmed,

    #[error("{operation} is not allowed while {phase:?}")]
    InvalidPhase {
        operation: &'static str,
        phase: AssistantPhase,
    },

    #[error("there is no preview to act on")]
    NoPreview,

    #[error(transparent)]
    Depth(#[from] DepthError),

    #[error(transparent)]
    Transition(#[from] ValidationError),
}

/// Issued when an asynchronous turn starts.
#[derive(Debug, Clone, PartialEq)]
pub struct TurnTicket {
    pub seq: u64,
    /// The user's text for this turn.
    pub text: String,
    /// Requirements before this turn.
    pub prior: Requirements,
    /// Question count of the preview on screen, if any.
    pub preview_count: Option<usize>,
}

/// How a new-intent turn ended.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentResolution {
    /// Required fields are missing; ask these.
    FollowUp(FollowUp),
    Generated(QuestionSet),
    GenerationFailed,
}

/// Offered once the follow-up queue drains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProceedOffer {
    /// Labels of the optional fields still open.
    pub missing_optional: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    Asked(FollowUpQuestion),
    Proposed(ProceedOffer),
    Previewed(PreviewDocument),
    GenerationFailed,
    /// A newer turn started first; this result was dropped.
    Superseded,
}

/// Read model for the UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub entries: Vec<ChatEntry>,
    pub preview: Option<PreviewDocument>,
    pub follow_up_prompt: Option<FollowUpQuestion>,
    pub awaiting_response: bool,
    pub phase: AssistantPhase,
    pub suggestions: Vec<CustomizationIntent>,
    pub offer: Option<ProceedOffer>,
}

#[derive(Debug, Clone)]
pub struct SurveyConversation {
    id: ConversationId,
    phase: AssistantPhase,
    entries: Vec<ChatEntry>,
    requirements: Requirements,
    queue: Option<FollowUpQueue>,
    preview: Option<PreviewDocument>,
    offer: Option<ProceedOffer>,
    suggestions: Vec<CustomizationIntent>,
    turn_seq: u64,
    awaiting: bool,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl SurveyConversation {
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            id: ConversationId::new(),
            phase: AssistantPhase::Idle,
            entries: Vec::new(),
            requirements: Requirements::empty(),
            queue: None,
            preview: None,
            offer: None,
            suggestions: Vec::new(),
            turn_seq: 0,
            awaiting: false,
            created_at: now,
            updated_at: now,
        }
    }

    // === Accessors ===

    pub fn id(&self) -> ConversationId {
        self.id
    }

    pub fn phase(&self) -> AssistantPhase {
        self.phase
    }

    pub fn entries(&self) -> &[ChatEntry] {
        &self.entries
    }

    pub fn requirements(&self) -> &Requirements {
        &self.requirements
    }

    pub fn preview(&self) -> Option<&PreviewDocument> {
        self.preview.as_ref()
    }

    pub fn current_follow_up(&self) -> Option<&FollowUpQuestion> {
        self.queue.as_ref().and_then(FollowUpQueue::current)
    }

    pub fn turn_seq(&self) -> u64 {
        self.turn_seq
    }

    pub fn is_awaiting_response(&self) -> bool {
        self.awaiting
    }

    pub fn suggestions(&self) -> &[CustomizationIntent] {
        &self.suggestions
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn view(&self) -> ConversationView {
        ConversationView {
            entries: self.entries.clone(),
            preview: self.preview.clone(),
            follow_up_prompt: self.current_follow_up().cloned(),
            awaiting_response: self.awaiting,
            phase: self.phase,
            suggestions: self.suggestions.clone(),
            offer: self.offer.clone(),
        }
    }

    // === New-intent turns ===

    /// Records a chat message as new intent and starts a turn.
    ///
    /// Any earlier turn still in flight is superseded by this one.
    pub fn begin_turn(
        &mut self,
        text: &str,
        attachments: Vec<Attachment>,
    ) -> Result<TurnTicket, ConversationError> {
        self.ensure_live()?;
        if !self.phase.accepts_new_intent() {
            return Err(self.invalid("submit_user_message"));
        }
        if text.trim().is_empty() && attachments.is_empty() {
            return Err(ConversationError::EmptyMessage);
        }

        self.transition(AssistantPhase::Extracting)?;
        self.entries.push(ChatEntry::user(text, attachments));
        self.queue = None;
        self.offer = None;
        self.suggestions.clear();
        Ok(self.issue_ticket(text))
    }

    /// Applies the result of a new-intent turn if it is still current.
    pub fn complete_intent_turn(
        &mut self,
        seq: u64,
        requirements: Requirements,
        resolution: IntentResolution,
    ) -> Result<TurnOutcome, ConversationError> {
        if seq != self.turn_seq || self.phase != AssistantPhase::Extracting {
            debug!(seq, current = self.turn_seq, "discarding stale turn result");
            return Ok(TurnOutcome::Superseded);
        }
        self.requirements = requirements;
        self.awaiting = false;

        match resolution {
            IntentResolution::FollowUp(plan) => self.start_follow_ups(plan),
            IntentResolution::Generated(set) => self.present_generated(set),
            IntentResolution::GenerationFailed => self.generation_failed(),
        }
    }

    // === Follow-ups ===

    /// Interprets a message as the answer to the current follow-up.
    pub fn answer_follow_up(&mut self, text: &str) -> Result<TurnOutcome, ConversationError> {
        if self.phase != AssistantPhase::FollowingUp {
            return Err(self.invalid("submit_follow_up_answer"));
        }
        let queue = self
            .queue
            .as_mut()
            .ok_or(ConversationError::InvalidPhase {
                operation: "submit_follow_up_answer",
                phase: self.phase,
            })?;
        let state = queue.answer(&mut self.requirements, text)?;
        self.entries.push(ChatEntry::user(text.trim(), Vec::new()));
        self.touch();

        match state {
            DepthState::Resolved => self.propose(),
            _ => self.ask_next(),
        }
    }

    /// Leaves the proposal and returns to free chat.
    ///
    /// A generation started from the proposal and still in flight is
    /// superseded.
    pub fn continue_refining(&mut self) -> Result<(), ConversationError> {
        if self.phase != AssistantPhase::Proposing {
            return Err(self.invalid("continue_refining"));
        }
        self.transition(AssistantPhase::Idle)?;
        self.turn_seq += 1;
        self.awaiting = false;
        self.offer = None;
        self.entries.push(ChatEntry::assistant(replies::REFINE_PROMPT));
        Ok(())
    }

    // === Generation after a proposal ===

    pub fn begin_generation(&mut self) -> Result<TurnTicket, ConversationError> {
        if self.phase != AssistantPhase::Proposing {
            return Err(self.invalid("accept_proceed"));
        }
        self.entries
            .push(ChatEntry::user(replies::PROCEED_CHOICE, Vec::new()));
        self.offer = None;
        Ok(self.issue_ticket(replies::PROCEED_CHOICE))
    }

    pub fn complete_generation(
        &mut self,
        seq: u64,
        generated: Option<QuestionSet>,
    ) -> Result<TurnOutcome, ConversationError> {
        if seq != self.turn_seq || self.phase != AssistantPhase::Proposing {
            debug!(seq, current = self.turn_seq, "discarding stale generation result");
            return Ok(TurnOutcome::Superseded);
        }
        self.awaiting = false;
        match generated {
            Some(set) => self.present_generated(set),
            None => self.generation_failed(),
        }
    }

    // === Previews ===

    /// Shows a catalog preview directly, superseding any turn in flight.
    pub fn show_preview(
        &mut self,
        preview: PreviewDocument,
        message: String,
    ) -> Result<PreviewDocument, ConversationError> {
        self.ensure_live()?;
        self.transition(AssistantPhase::Previewing)?;
        self.turn_seq += 1;
        self.awaiting = false;
        self.queue = None;
        self.offer = None;
        self.suggestions.clear();
        self.requirements = preview.requirements();
        self.entries.push(ChatEntry::assistant(message));
        self.preview = Some(preview.clone());
        Ok(preview)
    }

    /// Seeds the preview back into the chat and offers customizations.
    pub fn request_edit(&mut self) -> Result<String, ConversationError> {
        if self.phase != AssistantPhase::Previewing {
            return Err(self.invalid("request_edit"));
        }
        let seed = self
            .preview
            .as_ref()
            .ok_or(ConversationError::NoPreview)?
            .edit_seed();

        self.transition(AssistantPhase::EditRequested)?;
        self.entries.push(ChatEntry::user(seed.as_str(), Vec::new()));
        let extracted = LocalExtractor::new().extract(&seed).requirements;
        self.requirements = self.requirements.merge(&extracted);
        self.entries
            .push(ChatEntry::assistant(replies::CUSTOMIZE_PROMPT));
        self.suggestions = CustomizationIntent::ALL.to_vec();
        Ok(seed)
    }

    /// The draft that confirming would hand off.
    pub fn prepare_handoff(&self) -> Result<HandoffDraft, ConversationError> {
        self.ensure_live()?;
        if self.phase != AssistantPhase::Previewing {
            return Err(self.invalid("confirm_preview"));
        }
        self.preview
            .as_ref()
            .map(PreviewDocument::handoff)
            .ok_or(ConversationError::NoPreview)
    }

    pub fn mark_confirmed(&mut self) -> Result<(), ConversationError> {
        self.ensure_live()?;
        if self.preview.is_none() {
            return Err(ConversationError::NoPreview);
        }
        self.transition(AssistantPhase::Confirmed)?;
        self.suggestions.clear();
        self.entries.push(ChatEntry::assistant(replies::CONFIRMED));
        Ok(())
    }

    // === Internals ===

    fn issue_ticket(&mut self, text: &str) -> TurnTicket {
        self.turn_seq += 1;
        self.awaiting = true;
        self.touch();
        TurnTicket {
            seq: self.turn_seq,
            text: text.to_string(),
            prior: self.requirements.clone(),
            preview_count: self.preview.as_ref().map(PreviewDocument::question_count),
        }
    }

    fn start_follow_ups(&mut self, plan: FollowUp) -> Result<TurnOutcome, ConversationError> {
        self.transition(AssistantPhase::FollowingUp)?;
        self.queue = Some(FollowUpQueue::from_plan(plan)?);
        if self.queue.as_ref().map_or(true, FollowUpQueue::is_resolved) {
            return self.propose();
        }
        self.ask_next()
    }

    fn ask_next(&mut self) -> Result<TurnOutcome, ConversationError> {
        let queue = self
            .queue
            .as_mut()
            .ok_or(DepthError::NothingQueued)?;
        let question = queue.present()?.clone();
        self.entries
            .push(ChatEntry::assistant(replies::follow_up_prompt(&question)));
        Ok(TurnOutcome::Asked(question))
    }

    fn propose(&mut self) -> Result<TurnOutcome, ConversationError> {
        self.transition(AssistantPhase::Proposing)?;
        self.queue = None;
        let offer = ProceedOffer {
            missing_optional: DepthEngine::new().missing_optional_labels(&self.requirements),
        };
        self.entries
            .push(ChatEntry::assistant(replies::proposal(&offer.missing_optional)));
        self.offer = Some(offer.clone());
        Ok(TurnOutcome::Proposed(offer))
    }

    fn present_generated(&mut self, set: QuestionSet) -> Result<TurnOutcome, ConversationError> {
        self.transition(AssistantPhase::Previewing)?;
        let preview = PreviewDocument::from_question_set(&self.requirements, set);
        let message = if preview.is_empty() {
            EMPTY_STATE_MESSAGE.to_string()
        } else {
            replies::generated(&preview)
        };
        self.entries.push(ChatEntry::assistant(message));
        self.preview = Some(preview.clone());
        Ok(TurnOutcome::Previewed(preview))
    }

    fn generation_failed(&mut self) -> Result<TurnOutcome, ConversationError> {
        self.transition(AssistantPhase::Idle)?;
        self.entries
            .push(ChatEntry::assistant(replies::GENERATION_FAILED));
        Ok(TurnOutcome::GenerationFailed)
    }

    fn transition(&mut self, target: AssistantPhase) -> Result<(), ConversationError> {
        let next = self.phase.transition_to(target)?;
        debug!(conversation_id = %self.id, from = self.phase.label(), to = next.label(), "phase change");
        self.phase = next;
        self.touch();
        Ok(())
    }

    fn ensure_live(&self) -> Result<(), ConversationError> {
        if self.phase.is_terminal() {
            Err(ConversationError::AlreadyConfirmed)
        } else {
            Ok(())
        }
    }

    fn invalid(&self, operation: &'static str) -> ConversationError {
        ConversationError::InvalidPhase {
            operation,
            phase: self.phase,
        }
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}

impl Default for SurveyConversation {
    fn default() -> Self {
        Self::new()
    }
}
