//! Catalog adapters - implementations of the `SurveyCatalog` port.

mod static_catalog;

pub use static_catalog::StaticSurveyCatalog;
