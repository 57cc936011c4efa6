//! The one-question-at-a-time follow-up loop.

use std::collections::VecDeque;

use tracing::debug;

use super::DepthError;
use crate::domain::foundation::StateMachine;
use crate::domain::survey::{FieldPath, FieldValue, FollowUp, FollowUpQuestion, Requirements};

/// Lifecycle of a follow-up queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DepthState {
    Scanning,
    Queued,
    Answering,
    Resolved,
}

impl StateMachine for DepthState {
    fn can_transition_to(&self, target: &Self) -> bool {
        self.valid_transitions().contains(target)
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use DepthState::*;
        match self {
            Scanning => vec![Queued, Resolved],
            Queued => vec![Answering],
            Answering => vec![Queued, Resolved],
            Resolved => vec![],
        }
    }
}

/// Questions from one plan, asked strictly one at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct FollowUpQueue {
    state: DepthState,
    pending: VecDeque<FollowUpQuestion>,
    current: Option<FollowUpQuestion>,
    answered: Vec<FollowUpQuestion>,
    deferred: Vec<String>,
}

impl FollowUpQueue {
    /// Starts a queue from a plan. An empty plan resolves immediately.
    pub fn from_plan(plan: FollowUp) -> Result<Self, DepthError> {
        let pending: VecDeque<_> = plan.additional_questions.into_iter().collect();
        let target = if pending.is_empty() {
            DepthState::Resolved
        } else {
            DepthState::Queued
        };
        let state = DepthState::Scanning.transition_to(target)?;
        Ok(Self {
            state,
            pending,
            current: None,
            answered: Vec::new(),
            deferred: plan.deferred_fields,
        })
    }

    pub fn state(&self) -> DepthState {
        self.state
    }

    pub fn is_resolved(&self) -> bool {
        self.state == DepthState::Resolved
    }

    /// The question awaiting an answer, if any.
    pub fn current(&self) -> Option<&FollowUpQuestion> {
        self.current.as_ref()
    }

    /// Questions still waiting behind the current one.
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    pub fn answered(&self) -> &[FollowUpQuestion] {
        &self.answered
    }

    pub fn deferred_fields(&self) -> &[String] {
        &self.deferred
    }

    /// Pops the next question and waits for its answer.
    ///
    /// A question whose dependencies are still pending is skipped over in
    /// favour of the first one that is ready; if none is ready the head is
    /// taken.
    pub fn present(&mut self) -> Result<&FollowUpQuestion, DepthError> {
        if self.state == DepthState::Answering {
            return Err(DepthError::AlreadyAnswering);
        }
        let next = self.state.transition_to(DepthState::Answering)?;

        let ready = self.pending.iter().position(|q| {
            q.depends_on
                .iter()
                .all(|dep| !self.pending.iter().any(|p| &p.id == dep))
        });
        let question = self
            .pending
            .remove(ready.unwrap_or(0))
            .ok_or(DepthError::NothingQueued)?;

        debug!(question_id = %question.id, path = %question.path, "follow-up presented");
        self.state = next;
        Ok(self.current.insert(question))
    }

    /// Writes the answer verbatim at the current question's path.
    ///
    /// Queued questions for a path that has now been answered are dropped,
    /// so no field is asked twice in one pass.
    pub fn answer(&mut self, req: &mut Requirements, text: &str) -> Result<DepthState, DepthError> {
        if self.state != DepthState::Answering {
            return Err(DepthError::NotAnswering { state: self.state });
        }
        if text.trim().is_empty() {
            return Err(DepthError::BlankAnswer);
        }
        let question = self.current.take().ok_or(DepthError::NothingQueued)?;

        req.set_at(&question.path, FieldValue::user(text));
        let path: FieldPath = question.path.clone();
        self.pending.retain(|q| q.path != path);
        self.answered.push(question);

        let target = if self.pending.is_empty() {
            DepthState::Resolved
        } else {
            DepthState::Queued
        };
        self.state = self.state.transition_to(target)?;
        debug!(path = %path, state = ?self.state, "follow-up answered");
        Ok(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::depth::DepthEngine;
    use crate::domain::survey::{FieldSource, RequiredField, ANSWER_CONFIDENCE};

    fn queue_for(req: &Requirements) -> FollowUpQueue {
        FollowUpQueue::from_plan(DepthEngine::new().plan(req, None)).unwrap()
    }

    mod transitions {
        use super::*;

        #[test]
        fn answering_returns_to_queued_or_resolves() {
            assert!(DepthState::Answering.can_transition_to(&DepthState::Queued));
            assert!(DepthState::Answering.can_transition_to(&DepthState::Resolved));
            assert!(!DepthState::Queued.can_transition_to(&DepthState::Resolved));
            assert!(DepthState::Resolved.is_terminal());
        }

        #[test]
        fn empty_plan_resolves_immediately() {
            let mut req = Requirements::empty();
            for f in RequiredField::ALL {
                *req.required.get_mut(f) = FieldValue::user("x");
            }
            let queue = queue_for(&req);
            assert!(queue.is_resolved());
            assert!(!queue.deferred_fields().is_empty());
        }
    }

    mod answering {
        use super::*;

        #[test]
        fn answer_is_written_verbatim_with_full_confidence() {
            let mut req = Requirements::empty();
            let mut queue = queue_for(&req);

            let q = queue.present().unwrap().clone();
            assert_eq!(q.path, RequiredField::Title.path());
            queue.answer(&mut req, "  新サービス認知調査 ").unwrap();

            let title = &req.required.title;
            assert_eq!(title.text().as_deref(), Some("  新サービス認知調査 "));
            assert_eq!(title.source, FieldSource::User);
            assert_eq!(title.confidence, ANSWER_CONFIDENCE);
        }

        #[test]
        fn drains_after_exactly_one_answer_per_missing_field() {
            let mut req = Requirements::empty();
            req.required.title = FieldValue::user("NPS調査");
            let mut queue = queue_for(&req);

            let mut asked = Vec::new();
            while !queue.is_resolved() {
                let q = queue.present().unwrap().clone();
                asked.push(q.path.clone());
                queue.answer(&mut req, "回答").unwrap();
            }
            assert_eq!(asked.len(), 3);
            assert!(req.is_complete());
        }

        #[test]
        fn blank_answer_keeps_question_open() {
            let mut req = Requirements::empty();
            let mut queue = queue_for(&req);
            queue.present().unwrap();

            assert_eq!(queue.answer(&mut req, "   "), Err(DepthError::BlankAnswer));
            assert_eq!(queue.state(), DepthState::Answering);
            assert!(queue.current().is_some());
        }

        #[test]
        fn only_one_question_outstanding() {
            let mut queue = queue_for(&Requirements::empty());
            queue.present().unwrap();
            assert_eq!(queue.present().unwrap_err(), DepthError::AlreadyAnswering);
        }

        #[test]
        fn answering_without_presenting_fails() {
            let mut req = Requirements::empty();
            let mut queue = queue_for(&req);
            assert!(matches!(
                queue.answer(&mut req, "x"),
                Err(DepthError::NotAnswering { state: DepthState::Queued })
            ));
        }

        #[test]
        fn duplicate_path_is_not_asked_twice() {
            let req = Requirements::empty();
            let mut plan = DepthEngine::new().plan(&req, None);
            let mut dup = plan.additional_questions[0].clone();
            dup.id = "again-title".into();
            plan.additional_questions.insert(1, dup);

            let mut req = req;
            let mut queue = FollowUpQueue::from_plan(plan).unwrap();
            queue.present().unwrap();
            queue.answer(&mut req, "タイトル").unwrap();
            let next = queue.present().unwrap();
            assert_eq!(next.path, RequiredField::Purpose.path());
        }

        #[test]
        fn dependencies_are_asked_after_their_prerequisites() {
            let req = Requirements::empty();
            let mut plan = DepthEngine::new().plan(&req, None);
            plan.additional_questions[0].depends_on = vec!["depth-purpose".into()];

            let mut queue = FollowUpQueue::from_plan(plan).unwrap();
            assert_eq!(queue.present().unwrap().id, "depth-purpose");
        }
    }
}
