//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `validation` - JSON schema layer for the three survey documents
//! - `generation` - Mock, HTTP and offline generation backends
//! - `catalog` - Built-in templates and past surveys
//! - `storage` - In-memory hand-off draft store

pub mod catalog;
pub mod generation;
pub mod storage;
pub mod validation;

pub use catalog::StaticSurveyCatalog;
pub use generation::{
    HttpAdapterConfig, HttpGenerationAdapter, MockGenerationAdapter, MockReply,
    OfflineGenerationAdapter,
};
pub use storage::InMemoryDraftStore;
pub use validation::JsonDocumentValidator;
