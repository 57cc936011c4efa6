//! Ports - interfaces for everything outside the domain.
//!
//! - `DocumentValidator` - the schema layer every stage output passes through
//! - `GenerationAdapter` - extraction, question and follow-up generation
//! - `SurveyCatalog` - templates and past surveys
//! - `DraftStore` - hand-off of the confirmed draft

mod draft_store;
mod generation_adapter;
mod schema_validator;
mod survey_catalog;

pub use draft_store::{DraftStore, DraftStoreError, ASSISTANT_DRAFT_KEY};
pub use generation_adapter::{AdapterInfo, Capability, GenerationAdapter, GenerationFailure};
pub use schema_validator::{DocumentShape, DocumentValidator, SchemaViolation};
pub use survey_catalog::{
    CatalogFilter, PastSurvey, PastSurveySort, SurveyCatalog, SurveyTemplate, TemplateQuestion,
};
