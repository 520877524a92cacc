use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::path::{ColumnPath, TablePath};

/// A configured data source and the exposure tree curated for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Connection {
    pub id: Uuid,
    pub name: String,
    /// Connection string used to reach the data source.
    pub dsn: String,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub dialect: Option<String>,
    /// Origin of the data source (`postgres`, `sqlite`, `csv`, ...).
    #[serde(default, rename = "type")]
    pub connection_type: Option<String>,
    #[serde(default)]
    pub is_sample: bool,
    #[serde(default)]
    pub options: SchemaSet,
}

impl Connection {
    /// Create a connection with a fresh id and an empty schema set.
    pub fn new(name: impl Into<String>, dsn: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            dsn: dsn.into(),
            database: None,
            dialect: None,
            connection_type: None,
            is_sample: false,
            options: SchemaSet::default(),
        }
    }
}

/// Ordered schemas exposed by a connection.
///
/// Positions double as addressing keys while a snapshot is being edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaSet {
    #[serde(default)]
    pub schemas: Vec<Schema>,
}

impl SchemaSet {
    pub fn new(schemas: Vec<Schema>) -> Self {
        Self { schemas }
    }

    pub fn schema(&self, schema_index: usize) -> Option<&Schema> {
        self.schemas.get(schema_index)
    }

    pub fn table(&self, path: TablePath) -> Option<&Table> {
        self.schema(path.schema_index)?.tables.get(path.table_index)
    }

    pub fn column(&self, path: ColumnPath) -> Option<&Column> {
        self.table(path.table())?.columns.get(path.column_index)
    }

    pub(crate) fn table_mut(&mut self, path: TablePath) -> Option<&mut Table> {
        self.schemas
            .get_mut(path.schema_index)?
            .tables
            .get_mut(path.table_index)
    }

    pub(crate) fn column_mut(&mut self, path: ColumnPath) -> Option<&mut Column> {
        self.table_mut(path.table())?
            .columns
            .get_mut(path.column_index)
    }

    /// Effective visibility of a table, or `None` when the path does not resolve.
    pub fn table_visibility(&self, path: TablePath) -> Option<bool> {
        let schema = self.schema(path.schema_index)?;
        let table = schema.tables.get(path.table_index)?;
        Some(crate::cascade::effective_visibility(schema, table))
    }

    /// Look up a schema position by name.
    pub fn position_of(&self, schema_name: &str) -> Option<usize> {
        self.schemas
            .iter()
            .position(|schema| schema.name == schema_name)
    }
}

/// A namespace in the data source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Schema {
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub tables: Vec<Table>,
}

/// A table inside a schema.
///
/// `enabled` is the stored flag only; see [`crate::cascade::effective_visibility`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Table {
    pub name: String,
    pub enabled: bool,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub columns: Vec<Column>,
}

/// Column metadata plus enrichment results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub column_type: String,
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub primary_key: bool,
    #[serde(default)]
    pub possible_values: Vec<String>,
    #[serde(default)]
    pub relationship: Vec<Relationship>,
    /// Fields written under names outside the known set.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Candidate foreign-key edge, referenced by name only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Relationship {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub schema_name: String,
    #[serde(default)]
    pub table: String,
    #[serde(default)]
    pub column: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Relationship {
    pub fn new(
        schema_name: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            enabled,
            schema_name: schema_name.into(),
            table: table.into(),
            column: column.into(),
            extra: BTreeMap::new(),
        }
    }
}
