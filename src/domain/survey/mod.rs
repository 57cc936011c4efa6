//! Survey documents exchanged between the pipeline stages.
//!
//! Three shapes cross stage boundaries: [`Requirements`] (the structured brief),
//! [`QuestionSet`] (generated questions with routing) and [`FollowUp`] (the
//! missing-field interrogation plan). All are validated by the schema layer
//! before a stage reads them.

mod field;
mod field_path;
mod follow_up;
mod meta;
mod mode;
mod question_set;
mod requirements;

pub use field::{
    FieldContent, FieldSource, FieldValue, Priority, ANSWER_CONFIDENCE, DERIVED_CONFIDENCE,
    LABELED_CONFIDENCE, WHOLE_TEXT_CONFIDENCE,
};
pub use field_path::{FieldPath, FieldPathError, OptionalField, RequiredField};
pub use follow_up::{AnswerValidation, ExpectedFormat, FollowUp, FollowUpQuestion, NextAction};
pub use meta::{Meta, PromptChain, DEFAULT_LOCALE, DEFAULT_VERSION};
pub use mode::{
    clamp_question_count, AudienceCategory, SurveyMode, MAX_QUESTION_COUNT, MIN_QUESTION_COUNT,
};
pub use question_set::{
    BranchRule, BranchWhen, Choice, InternalType, MethodDecomposition, Question,
    QuestionConstraints, QuestionFormat, QuestionSet, ReferentialIntegrityError, Scale, END_TOKEN,
};
pub use requirements::{
    CompletionPolicy, ConfirmationQuestion, RequiredFields, Requirements,
};
