use std::env;

use anyhow::{Context, Result};
use curator_core::merge_schema_sets;
use curator_introspect::{CatalogAdapter, DiscoverOptions, PostgresAdapter};
use curator_session::{PossibleValuesProvider, RelationshipProvider};
use serde_json::json;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

const FIXTURE: &[&str] = &[
    "drop schema if exists curator_it cascade",
    "create schema curator_it",
    "create table curator_it.users (id integer primary key, status text not null)",
    "create table curator_it.orders (id integer primary key, user_id integer references curator_it.users(id))",
    "insert into curator_it.users values (1, 'active'), (2, 'inactive'), (3, 'active')",
];

/// Returns `None` when no database is configured, so the suite can run offline.
async fn connect() -> Result<Option<PgPool>> {
    let Ok(url) = env::var("TEST_DATABASE_URL").or_else(|_| env::var("DATABASE_URL")) else {
        eprintln!("skipping: set TEST_DATABASE_URL or DATABASE_URL for integration tests");
        return Ok(None);
    };

    let pool = PgPoolOptions::new()
        .max_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(10))
        .connect(&url)
        .await
        .context("connecting to Postgres")?;

    for statement in FIXTURE {
        sqlx::query(statement)
            .execute(&pool)
            .await
            .with_context(|| format!("executing fixture: {statement}"))?;
    }

    Ok(Some(pool))
}

#[tokio::test]
async fn discovers_and_enriches_fixture_schema() -> Result<()> {
    let Some(pool) = connect().await? else {
        return Ok(());
    };
    let adapter = PostgresAdapter::new(pool);
    let opts = DiscoverOptions {
        schemas: Some(vec!["curator_it".to_string()]),
        ..DiscoverOptions::default()
    };

    let discovered = adapter.discover(&opts).await?;
    let tree = merge_schema_sets(None, discovered);

    assert_eq!(tree.schemas.len(), 1);
    let schema = &tree.schemas[0];
    let names: Vec<&str> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["orders", "users"]);
    assert!(schema.tables[1].columns[0].primary_key);
    assert_eq!(schema.tables[1].columns[0].column_type, "integer");

    let id = Uuid::new_v4();
    let values = PossibleValuesProvider::fetch(&adapter, id, "curator_it", "users", "status").await?;
    assert_eq!(values, json!(["active", "inactive"]));

    let relationships =
        RelationshipProvider::fetch(&adapter, id, "curator_it", "users", "id", "integer").await?;
    assert_eq!(
        relationships,
        json!([{
            "enabled": true,
            "schema_name": "curator_it",
            "table": "orders",
            "column": "user_id"
        }])
    );

    Ok(())
}
