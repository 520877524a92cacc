//! Catalog discovery and column enrichment backed by a live database.

pub mod adapter;
pub mod options;
pub mod postgres;

pub use adapter::CatalogAdapter;
pub use options::{DiscoverOptions, EnrichOptions};
pub use postgres::{PostgresAdapter, discover_postgres};
