//! Path-addressed, copy-on-write edits to a [`SchemaSet`].
//!
//! Every function here takes the current tree by reference and returns a new
//! tree. A path that no longer resolves (for example when an enrichment result
//! lands after the tree was restructured) produces an unmodified copy instead
//! of an error.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::cascade::{set_schema_enabled, set_table_enabled};
use crate::error::{Error, Result};
use crate::model::{Column, Relationship, SchemaSet};
use crate::path::{ColumnPath, TablePath};

/// Assignment of one column field.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnField {
    Name(String),
    Description(String),
    Type(String),
    Enabled(bool),
    PrimaryKey(bool),
    PossibleValues(Vec<String>),
    Relationship(Vec<Relationship>),
    /// Field outside the known set; stored in [`Column::extra`]. A known
    /// name here is assigned to its typed field instead.
    Other(String, Value),
}

/// Assignment of one relationship field.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipField {
    Enabled(bool),
    SchemaName(String),
    Table(String),
    Column(String),
    /// Stored in [`Relationship::extra`] unless the name is a known field.
    Other(String, Value),
}

/// Target and value of a single-field edit below a column path.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldUpdate {
    Column(ColumnField),
    Relationship {
        relation_index: usize,
        field: RelationshipField,
    },
}

impl ColumnField {
    /// Map a field name and JSON value onto a typed assignment.
    ///
    /// Unknown names are accepted as [`ColumnField::Other`].
    pub fn parse(field_name: &str, value: Value) -> Result<Self> {
        let field = match field_name {
            "name" => Self::Name(decode(field_name, value)?),
            "description" => Self::Description(decode(field_name, value)?),
            "type" => Self::Type(decode(field_name, value)?),
            "enabled" => Self::Enabled(decode(field_name, value)?),
            "primary_key" => Self::PrimaryKey(decode(field_name, value)?),
            "possible_values" => Self::PossibleValues(decode(field_name, value)?),
            "relationship" => Self::Relationship(decode(field_name, value)?),
            other => Self::Other(other.to_string(), value),
        };
        Ok(field)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Name(_) => "name",
            Self::Description(_) => "description",
            Self::Type(_) => "type",
            Self::Enabled(_) => "enabled",
            Self::PrimaryKey(_) => "primary_key",
            Self::PossibleValues(_) => "possible_values",
            Self::Relationship(_) => "relationship",
            Self::Other(name, _) => name,
        }
    }

    fn assign(self, column: &mut Column) {
        match self {
            Self::Name(value) => column.name = value,
            Self::Description(value) => column.description = value,
            Self::Type(value) => column.column_type = value,
            Self::Enabled(value) => column.enabled = value,
            Self::PrimaryKey(value) => column.primary_key = value,
            Self::PossibleValues(value) => column.possible_values = value,
            Self::Relationship(value) => column.relationship = value,
            Self::Other(name, value) => match Self::parse(&name, value) {
                Ok(Self::Other(name, value)) => {
                    column.extra.insert(name, value);
                }
                Ok(field) => field.assign(column),
                Err(err) => tracing::debug!(event = "field_rejected", error = %err),
            },
        }
    }
}

impl RelationshipField {
    pub fn parse(field_name: &str, value: Value) -> Result<Self> {
        let field = match field_name {
            "enabled" => Self::Enabled(decode(field_name, value)?),
            "schema_name" => Self::SchemaName(decode(field_name, value)?),
            "table" => Self::Table(decode(field_name, value)?),
            "column" => Self::Column(decode(field_name, value)?),
            other => Self::Other(other.to_string(), value),
        };
        Ok(field)
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Enabled(_) => "enabled",
            Self::SchemaName(_) => "schema_name",
            Self::Table(_) => "table",
            Self::Column(_) => "column",
            Self::Other(name, _) => name,
        }
    }

    fn assign(self, relationship: &mut Relationship) {
        match self {
            Self::Enabled(value) => relationship.enabled = value,
            Self::SchemaName(value) => relationship.schema_name = value,
            Self::Table(value) => relationship.table = value,
            Self::Column(value) => relationship.column = value,
            Self::Other(name, value) => match Self::parse(&name, value) {
                Ok(Self::Other(name, value)) => {
                    relationship.extra.insert(name, value);
                }
                Ok(field) => field.assign(relationship),
                Err(err) => tracing::debug!(event = "field_rejected", error = %err),
            },
        }
    }
}

impl FieldUpdate {
    /// Build an update from loosely typed caller input.
    ///
    /// A missing or negative `relation_index` addresses the column itself.
    pub fn parse(relation_index: Option<i64>, field_name: &str, value: Value) -> Result<Self> {
        match relation_index.and_then(|index| usize::try_from(index).ok()) {
            Some(relation_index) => Ok(Self::Relationship {
                relation_index,
                field: RelationshipField::parse(field_name, value)?,
            }),
            None => Ok(Self::Column(ColumnField::parse(field_name, value)?)),
        }
    }

    pub fn field_name(&self) -> &str {
        match self {
            Self::Column(field) => field.name(),
            Self::Relationship { field, .. } => field.name(),
        }
    }
}

fn decode<T: DeserializeOwned>(field: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|err| Error::InvalidValue {
        field: field.to_string(),
        message: err.to_string(),
    })
}

/// Assign one field on the column (or one of its relationships) at `path`.
pub fn set_column_field(tree: &SchemaSet, path: ColumnPath, update: FieldUpdate) -> SchemaSet {
    let mut next = tree.clone();
    let field_name = update.field_name().to_string();

    let Some(column) = next.column_mut(path) else {
        tracing::debug!(event = "stale_path", path = %path, field = %field_name);
        return next;
    };

    match update {
        FieldUpdate::Column(field) => field.assign(column),
        FieldUpdate::Relationship {
            relation_index,
            field,
        } => match column.relationship.get_mut(relation_index) {
            Some(relationship) => field.assign(relationship),
            None => {
                tracing::debug!(
                    event = "stale_path",
                    path = %path,
                    relation_index,
                    field = %field_name
                );
            }
        },
    }

    next
}

/// Replace the free-text description of the table at `path`.
pub fn set_table_description(tree: &SchemaSet, path: TablePath, value: impl Into<String>) -> SchemaSet {
    let mut next = tree.clone();
    match next.table_mut(path) {
        Some(table) => table.description = value.into(),
        None => {
            tracing::debug!(
                event = "stale_path",
                schema_index = path.schema_index,
                table_index = path.table_index,
                field = "description"
            );
        }
    }
    next
}

/// Any edit the session can apply to its tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetSchemaEnabled { schema_index: usize, enabled: bool },
    SetTableEnabled { path: TablePath, enabled: bool },
    SetTableDescription { path: TablePath, description: String },
    SetColumnField { path: ColumnPath, update: FieldUpdate },
}

impl Mutation {
    /// Produce the edited tree, leaving `tree` untouched.
    pub fn apply(&self, tree: &SchemaSet) -> SchemaSet {
        match self {
            Self::SetSchemaEnabled {
                schema_index,
                enabled,
            } => set_schema_enabled(tree, *schema_index, *enabled),
            Self::SetTableEnabled { path, enabled } => set_table_enabled(tree, *path, *enabled),
            Self::SetTableDescription { path, description } => {
                set_table_description(tree, *path, description.clone())
            }
            Self::SetColumnField { path, update } => set_column_field(tree, *path, update.clone()),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::SetSchemaEnabled { .. } => "set_schema_enabled",
            Self::SetTableEnabled { .. } => "set_table_enabled",
            Self::SetTableDescription { .. } => "set_table_description",
            Self::SetColumnField { .. } => "set_column_field",
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::model::{Schema, Table};

    fn column(name: &str) -> Column {
        Column {
            name: name.to_string(),
            column_type: "text".to_string(),
            enabled: true,
            ..Column::default()
        }
    }

    fn tree() -> SchemaSet {
        let mut id = column("id");
        id.primary_key = true;
        id.relationship = vec![Relationship::new("public", "orders", "user_id", false)];

        SchemaSet::new(vec![Schema {
            name: "public".to_string(),
            enabled: true,
            tables: vec![
                Table {
                    name: "users".to_string(),
                    enabled: true,
                    description: "accounts".to_string(),
                    columns: vec![id, column("status")],
                },
                Table {
                    name: "orders".to_string(),
                    enabled: false,
                    description: String::new(),
                    columns: vec![column("user_id")],
                },
            ],
        }])
    }

    #[test]
    fn column_edit_touches_only_the_addressed_field() {
        let tree = tree();
        let path = ColumnPath::new(0, 0, 1);

        let next = set_column_field(
            &tree,
            path,
            FieldUpdate::Column(ColumnField::Description("lifecycle state".to_string())),
        );

        assert_eq!(next.column(path).map(|c| c.description.as_str()), Some("lifecycle state"));

        let mut expected = tree.clone();
        expected.schemas[0].tables[0].columns[1].description = "lifecycle state".to_string();
        assert_eq!(next, expected);
    }

    #[test]
    fn input_tree_is_never_mutated() {
        let tree = tree();
        let snapshot = tree.clone();

        let _ = set_column_field(
            &tree,
            ColumnPath::new(0, 0, 0),
            FieldUpdate::Column(ColumnField::PossibleValues(vec!["1".to_string()])),
        );
        let _ = set_table_description(&tree, TablePath::new(0, 1), "fulfilment");

        assert_eq!(tree, snapshot);
    }

    #[test]
    fn relationship_edit_targets_one_entry() {
        let tree = tree();
        let path = ColumnPath::new(0, 0, 0);

        let next = set_column_field(
            &tree,
            path,
            FieldUpdate::Relationship {
                relation_index: 0,
                field: RelationshipField::Enabled(true),
            },
        );

        let relationship = &next.column(path).expect("column").relationship[0];
        assert!(relationship.enabled);
        assert_eq!(relationship.table, "orders");
        assert!(next.column(path).expect("column").enabled);
    }

    #[test]
    fn out_of_range_paths_are_no_ops() {
        let tree = tree();
        let update = FieldUpdate::Column(ColumnField::Enabled(false));

        for path in [
            ColumnPath::new(0, 0, 5),
            ColumnPath::new(0, 3, 0),
            ColumnPath::new(2, 0, 0),
        ] {
            assert_eq!(set_column_field(&tree, path, update.clone()), tree);
        }

        let missing_relation = FieldUpdate::Relationship {
            relation_index: 4,
            field: RelationshipField::Enabled(true),
        };
        assert_eq!(set_column_field(&tree, ColumnPath::new(0, 0, 0), missing_relation), tree);

        let empty_relations = FieldUpdate::Relationship {
            relation_index: 0,
            field: RelationshipField::Enabled(true),
        };
        assert_eq!(set_column_field(&tree, ColumnPath::new(0, 0, 1), empty_relations), tree);

        assert_eq!(set_table_description(&tree, TablePath::new(0, 8), "x"), tree);
    }

    #[test]
    fn unknown_field_names_land_in_extra() {
        let tree = tree();
        let path = ColumnPath::new(0, 0, 1);
        let update = FieldUpdate::parse(None, "reverse_look_up", json!(true)).expect("parse");

        let next = set_column_field(&tree, path, update);

        let column = next.column(path).expect("column");
        assert_eq!(column.extra.get("reverse_look_up"), Some(&json!(true)));
        assert_eq!(column.name, "status");
    }

    #[test]
    fn other_with_known_name_sets_the_typed_field() {
        let tree = tree();
        let path = ColumnPath::new(0, 0, 0);

        let renamed = set_column_field(
            &tree,
            path,
            FieldUpdate::Column(ColumnField::Other("name".to_string(), json!("user_id"))),
        );
        let column = renamed.column(path).expect("column");
        assert_eq!(column.name, "user_id");
        assert!(column.extra.is_empty());
        let encoded = serde_json::to_string(column).expect("encode");
        assert_eq!(encoded.matches("\"name\"").count(), 1);

        let retargeted = set_column_field(
            &tree,
            path,
            FieldUpdate::Relationship {
                relation_index: 0,
                field: RelationshipField::Other("table".to_string(), json!("invoices")),
            },
        );
        let relationship = &retargeted.column(path).expect("column").relationship[0];
        assert_eq!(relationship.table, "invoices");
        assert!(relationship.extra.is_empty());

        let mistyped = FieldUpdate::Column(ColumnField::Other("enabled".to_string(), json!("yes")));
        assert_eq!(set_column_field(&tree, path, mistyped), tree);
    }

    #[test]
    fn parse_routes_by_relation_index() {
        let column = FieldUpdate::parse(Some(-1), "enabled", json!(false)).expect("parse");
        assert_eq!(column, FieldUpdate::Column(ColumnField::Enabled(false)));

        let relation = FieldUpdate::parse(Some(2), "table", json!("orders")).expect("parse");
        assert_eq!(
            relation,
            FieldUpdate::Relationship {
                relation_index: 2,
                field: RelationshipField::Table("orders".to_string()),
            }
        );
    }

    #[test]
    fn parse_rejects_mistyped_known_fields() {
        let err = FieldUpdate::parse(None, "primary_key", json!("yes")).unwrap_err();
        assert!(matches!(err, Error::InvalidValue { ref field, .. } if field == "primary_key"));
    }

    #[test]
    fn mutation_dispatches_to_cascade_and_engine() {
        let tree = tree();

        let next = Mutation::SetSchemaEnabled {
            schema_index: 0,
            enabled: true,
        }
        .apply(&tree);
        assert!(next.schemas[0].tables.iter().all(|table| table.enabled));

        let next = Mutation::SetTableDescription {
            path: TablePath::new(0, 1),
            description: "fulfilment".to_string(),
        }
        .apply(&tree);
        assert_eq!(next.schemas[0].tables[1].description, "fulfilment");
    }
}
