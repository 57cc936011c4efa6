//! Storage adapters - implementations of the `DraftStore` port.

mod in_memory_draft_store;

pub use in_memory_draft_store::InMemoryDraftStore;
