use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use curator_core::{Result, Schema, SchemaSet};
use curator_session::{PossibleValuesProvider, ProviderError, RelationshipProvider};

use crate::adapter::CatalogAdapter;
use crate::options::{DiscoverOptions, EnrichOptions};

mod mapper;
mod queries;

/// Catalog adapter and enrichment provider for PostgreSQL.
#[derive(Debug, Clone)]
pub struct PostgresAdapter {
    pool: PgPool,
    enrich: EnrichOptions,
}

impl PostgresAdapter {
    /// Create a new adapter using a pre-configured pool.
    pub fn new(pool: PgPool) -> Self {
        Self::with_options(pool, EnrichOptions::default())
    }

    pub fn with_options(pool: PgPool, enrich: EnrichOptions) -> Self {
        Self { pool, enrich }
    }
}

#[async_trait]
impl CatalogAdapter for PostgresAdapter {
    fn engine(&self) -> &'static str {
        "postgres"
    }

    async fn discover(&self, opts: &DiscoverOptions) -> Result<SchemaSet> {
        discover_postgres(&self.pool, opts).await
    }
}

#[async_trait]
impl PossibleValuesProvider for PostgresAdapter {
    async fn fetch(
        &self,
        connection_id: Uuid,
        schema_name: &str,
        table_name: &str,
        column_name: &str,
    ) -> std::result::Result<Value, ProviderError> {
        let values = queries::sample_distinct_values(
            &self.pool,
            schema_name,
            table_name,
            column_name,
            self.enrich.sample_limit,
        )
        .await
        .map_err(provider_error)?;

        tracing::debug!(
            event = "values_sampled",
            connection_id = %connection_id,
            count = values.len()
        );
        Ok(Value::from(values))
    }
}

#[async_trait]
impl RelationshipProvider for PostgresAdapter {
    async fn fetch(
        &self,
        connection_id: Uuid,
        schema_name: &str,
        table_name: &str,
        column_name: &str,
        column_type: &str,
    ) -> std::result::Result<Value, ProviderError> {
        let raw = queries::list_relationships(
            &self.pool,
            schema_name,
            table_name,
            column_name,
            column_type,
        )
        .await
        .map_err(provider_error)?;
        let relationships = mapper::map_relationships(raw);

        tracing::debug!(
            event = "relationships_inferred",
            connection_id = %connection_id,
            count = relationships.len()
        );
        serde_json::to_value(relationships).map_err(|err| ProviderError::Query(err.to_string()))
    }
}

fn provider_error(err: sqlx::Error) -> ProviderError {
    match err {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            ProviderError::Transport(err.to_string())
        }
        other => ProviderError::Query(other.to_string()),
    }
}

/// Read the catalog of a Postgres database according to the provided options.
pub async fn discover_postgres(pool: &PgPool, opts: &DiscoverOptions) -> Result<SchemaSet> {
    let schemas = mapper::filter_schemas(queries::list_schemas(pool).await?, opts);
    let mut schema_items = Vec::new();

    for schema_name in schemas {
        let raw_tables = queries::list_tables_in_schema(pool, &schema_name).await?;
        let mut tables = mapper::map_tables(raw_tables, opts);

        for table in &mut tables {
            let raw_columns = queries::list_columns(pool, &schema_name, &table.name).await?;
            table.columns = mapper::map_columns(raw_columns, opts);
        }

        tracing::debug!(event = "schema_discovered", schema = %schema_name, tables = tables.len());
        schema_items.push(Schema {
            name: schema_name,
            enabled: false,
            tables,
        });
    }

    Ok(SchemaSet::new(schema_items))
}
