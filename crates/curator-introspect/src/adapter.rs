use async_trait::async_trait;

use curator_core::{Result, SchemaSet};

use crate::options::DiscoverOptions;

/// Trait implemented by database adapters that can list a catalog.
#[async_trait]
pub trait CatalogAdapter: Send + Sync {
    /// Returns the engine identifier (e.g. `postgres`).
    fn engine(&self) -> &'static str;

    /// Read schemas, tables and columns. Every flag in the result is `false`;
    /// use [`curator_core::merge_schema_sets`] to decide what is exposed.
    async fn discover(&self, opts: &DiscoverOptions) -> Result<SchemaSet>;
}
