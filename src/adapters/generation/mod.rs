//! Generation adapters - implementations of the `GenerationAdapter` port.

mod http_adapter;
mod mock_adapter;
mod offline_adapter;

pub use http_adapter::{HttpAdapterConfig, HttpGenerationAdapter};
pub use mock_adapter::{MockGenerationAdapter, MockReply};
pub use offline_adapter::OfflineGenerationAdapter;
