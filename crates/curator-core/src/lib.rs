//! Core contracts for Curator.
//!
//! This crate defines the editable schema-configuration tree, the pure
//! path-addressed mutation engine, the enable/disable cascade rules, and
//! validation helpers shared by the session layer, adapters, and the CLI.

pub mod cascade;
pub mod dsn;
pub mod error;
pub mod merge;
pub mod model;
pub mod mutate;
pub mod path;
pub mod redaction;
pub mod validation;

pub use cascade::{effective_visibility, set_schema_enabled, set_table_enabled};
pub use dsn::validate_dsn;
pub use error::{Error, Result};
pub use merge::merge_schema_sets;
pub use model::{Column, Connection, Relationship, Schema, SchemaSet, Table};
pub use mutate::{
    ColumnField, FieldUpdate, Mutation, RelationshipField, set_column_field,
    set_table_description,
};
pub use path::{ColumnKey, ColumnPath, TablePath};
pub use redaction::{RedactedConnection, redact_connection_string};
pub use validation::validate_schema_set;

/// Current contract version for serialized connection files.
pub const CONNECTION_FORMAT_VERSION: &str = "0.1";
