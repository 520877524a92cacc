use crate::model::{Schema, SchemaSet, Table};
use crate::path::TablePath;

/// Whether a table is exposed once its schema flag is taken into account.
pub fn effective_visibility(schema: &Schema, table: &Table) -> bool {
    table.enabled && schema.enabled
}

/// Set a schema flag and overwrite the flag of every table under it.
///
/// Returns an unmodified copy when `schema_index` does not resolve.
pub fn set_schema_enabled(tree: &SchemaSet, schema_index: usize, enabled: bool) -> SchemaSet {
    let mut next = tree.clone();
    match next.schemas.get_mut(schema_index) {
        Some(schema) => {
            schema.enabled = enabled;
            for table in &mut schema.tables {
                table.enabled = enabled;
            }
        }
        None => {
            tracing::debug!(event = "stale_path", schema_index, "schema index did not resolve");
        }
    }
    next
}

/// Set the stored flag of one table. The parent schema flag is never touched.
pub fn set_table_enabled(tree: &SchemaSet, path: TablePath, enabled: bool) -> SchemaSet {
    let mut next = tree.clone();
    match next.table_mut(path) {
        Some(table) => table.enabled = enabled,
        None => {
            tracing::debug!(
                event = "stale_path",
                schema_index = path.schema_index,
                table_index = path.table_index,
                "table path did not resolve"
            );
        }
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Column;

    fn table(name: &str, enabled: bool) -> Table {
        Table {
            name: name.to_string(),
            enabled,
            description: String::new(),
            columns: vec![Column {
                name: "id".to_string(),
                ..Column::default()
            }],
        }
    }

    fn tree() -> SchemaSet {
        SchemaSet::new(vec![
            Schema {
                name: "public".to_string(),
                enabled: true,
                tables: vec![table("users", false), table("orders", true)],
            },
            Schema {
                name: "audit".to_string(),
                enabled: false,
                tables: vec![table("events", false)],
            },
        ])
    }

    #[test]
    fn schema_toggle_overwrites_every_table() {
        let tree = tree();

        let enabled = set_schema_enabled(&tree, 0, true);
        assert!(enabled.schemas[0].enabled);
        assert!(enabled.schemas[0].tables.iter().all(|table| table.enabled));

        let disabled = set_schema_enabled(&enabled, 0, false);
        assert!(!disabled.schemas[0].enabled);
        assert!(disabled.schemas[0].tables.iter().all(|table| !table.enabled));

        assert_eq!(disabled.schemas[1], tree.schemas[1]);
    }

    #[test]
    fn disabled_public_schema_becomes_visible_after_enable() {
        let tree = SchemaSet::new(vec![Schema {
            name: "public".to_string(),
            enabled: false,
            tables: vec![table("users", true)],
        }]);

        let next = set_schema_enabled(&tree, 0, true);

        assert!(next.schemas[0].tables[0].enabled);
        assert_eq!(next.table_visibility(TablePath::new(0, 0)), Some(true));
    }

    #[test]
    fn table_toggle_leaves_schema_flag_alone() {
        let tree = tree();

        let next = set_table_enabled(&tree, TablePath::new(0, 1), false);
        assert!(next.schemas[0].enabled);
        assert!(!next.schemas[0].tables[1].enabled);
        assert_eq!(next.schemas[0].tables[0], tree.schemas[0].tables[0]);

        let next = set_table_enabled(&tree, TablePath::new(1, 0), true);
        assert!(!next.schemas[1].enabled);
        assert!(next.schemas[1].tables[0].enabled);
        assert_eq!(next.table_visibility(TablePath::new(1, 0)), Some(false));
    }

    #[test]
    fn visibility_requires_both_flags() {
        for schema_enabled in [false, true] {
            for table_enabled in [false, true] {
                let schema = Schema {
                    name: "s".to_string(),
                    enabled: schema_enabled,
                    tables: vec![table("t", table_enabled)],
                };
                assert_eq!(
                    effective_visibility(&schema, &schema.tables[0]),
                    schema_enabled && table_enabled
                );
            }
        }
    }

    #[test]
    fn stale_indices_return_unchanged_copy() {
        let tree = tree();
        assert_eq!(set_schema_enabled(&tree, 7, true), tree);
        assert_eq!(set_table_enabled(&tree, TablePath::new(0, 9), true), tree);
        assert_eq!(set_table_enabled(&tree, TablePath::new(4, 0), true), tree);
        assert_eq!(tree.table_visibility(TablePath::new(4, 0)), None);
    }
}
