//! Stage boundary between the orchestrator and the generation adapter.
//!
//! Every adapter call is bounded by a timeout and its output is passed
//! through the schema layer before anything reads it. Any failure falls
//! back to the local strategy for that stage, once, without retrying.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::domain::depth::DepthEngine;
use crate::domain::extraction::LocalExtractor;
use crate::domain::generation::QuestionGenerator;
use crate::domain::survey::{FollowUp, QuestionSet, Requirements};
use crate::ports::{Capability, DocumentValidator, GenerationAdapter, GenerationFailure, SchemaViolation};

/// Default bound on a single adapter call.
pub const DEFAULT_STAGE_TIMEOUT: Duration = Duration::from_secs(30);

/// Which strategy produced a stage result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Remote,
    Local,
}

/// Why the remote strategy was abandoned for a stage.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StageFailure {
    #[error(transparent)]
    Generation(#[from] GenerationFailure),

    #[error(transparent)]
    Schema(#[from] SchemaViolation),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    pub requirements: Requirements,
    /// Relative count change detected in the text, whichever strategy ran.
    pub count_adjustment: Option<i64>,
    pub strategy: Strategy,
}

pub struct GenerationPipeline {
    adapter: Arc<dyn GenerationAdapter>,
    validator: Arc<dyn DocumentValidator>,
    extractor: LocalExtractor,
    depth: DepthEngine,
    generator: QuestionGenerator,
    timeout: Duration,
}

impl GenerationPipeline {
    pub fn new(adapter: Arc<dyn GenerationAdapter>, validator: Arc<dyn DocumentValidator>) -> Self {
        Self {
            adapter,
            validator,
            extractor: LocalExtractor::new(),
            depth: DepthEngine::new(),
            generator: QuestionGenerator::new(),
            timeout: DEFAULT_STAGE_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn adapter_name(&self) -> String {
        self.adapter.adapter_info().name
    }

    /// Extracts Requirements from free text, remote first.
    pub async fn extract(&self, text: &str) -> Extraction {
        let local = self.extractor.extract(text);
        let remote = self
            .call(Capability::ExtractRequirements, self.adapter.extract_requirements(text))
            .await
            .and_then(|doc| Ok(self.validator.requirements(&doc)?));

        match remote {
            Ok(requirements) => Extraction {
                requirements,
                count_adjustment: local.count_adjustment,
                strategy: Strategy::Remote,
            },
            Err(failure) => {
                self.log_fallback(Capability::ExtractRequirements, &failure);
                Extraction {
                    requirements: local.requirements,
                    count_adjustment: local.count_adjustment,
                    strategy: Strategy::Local,
                }
            }
        }
    }

    /// Plans follow-ups, using the adapter's proposal when it validates.
    pub async fn plan_follow_ups(&self, requirements: &Requirements) -> FollowUp {
        let proposal = self
            .call(
                Capability::GenerateFollowUps,
                self.adapter.generate_follow_ups(requirements),
            )
            .await
            .and_then(|doc| Ok(self.validator.follow_up(&doc)?));

        match proposal {
            Ok(proposal) => self.depth.plan(requirements, Some(&proposal)),
            Err(failure) => {
                self.log_fallback(Capability::GenerateFollowUps, &failure);
                self.depth.plan(requirements, None)
            }
        }
    }

    /// Generates questions, remote first, then locally.
    ///
    /// Returns `None` only when neither output passes validation.
    pub async fn generate_questions(&self, requirements: &Requirements) -> Option<QuestionSet> {
        let remote = self
            .call(
                Capability::GenerateQuestions,
                self.adapter.generate_questions(requirements),
            )
            .await
            .and_then(|doc| Ok(self.validator.question_set(&doc)?));

        match remote {
            Ok(set) => return Some(set),
            Err(failure) => self.log_fallback(Capability::GenerateQuestions, &failure),
        }

        let local = self.generator.generate(requirements);
        let checked = serde_json::to_value(&local)
            .map_err(|e| SchemaViolation::InvalidFormat {
                path: "$".to_string(),
                format: format!("serializable question set ({})", e),
            })
            .and_then(|doc| self.validator.question_set(&doc));
        match checked {
            Ok(set) => Some(set),
            Err(violation) => {
                error!(error = %violation, "local question set failed validation");
                None
            }
        }
    }

    async fn call<F>(&self, capability: Capability, request: F) -> Result<Value, StageFailure>
    where
        F: Future<Output = Result<Value, GenerationFailure>>,
    {
        debug!(%capability, adapter = %self.adapter_name(), "calling generation adapter");
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(GenerationFailure::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
            .into()),
        }
    }

    fn log_fallback(&self, capability: Capability, failure: &StageFailure) {
        match failure {
            StageFailure::Generation(f) if !f.is_unexpected() => {
                debug!(%capability, reason = %f, "adapter unavailable, using local strategy");
            }
            _ => {
                warn!(%capability, error = %failure, "adapter output rejected, using local strategy");
            }
        }
    }
}
