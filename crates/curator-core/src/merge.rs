use std::collections::BTreeMap;

use crate::model::{Column, Schema, SchemaSet, Table};

/// Fold a freshly discovered catalog into the previously curated tree.
///
/// Without previous options everything discovered is exposed. Otherwise
/// curated flags, descriptions and enriched columns carry over by name, and
/// anything new to the catalog starts disabled. The result is sorted by schema
/// and table name, so it must only replace a tree at a snapshot boundary.
pub fn merge_schema_sets(old: Option<&SchemaSet>, discovered: SchemaSet) -> SchemaSet {
    let mut schemas = match old {
        None => discovered
            .schemas
            .into_iter()
            .map(enable_all)
            .collect::<Vec<_>>(),
        Some(old) => merge_with(old, discovered),
    };

    schemas.sort_by(|left, right| left.name.cmp(&right.name));
    for schema in &mut schemas {
        schema.tables.sort_by(|left, right| left.name.cmp(&right.name));
    }

    SchemaSet::new(schemas)
}

fn enable_all(mut schema: Schema) -> Schema {
    schema.enabled = true;
    for table in &mut schema.tables {
        table.enabled = true;
        for column in &mut table.columns {
            column.enabled = true;
        }
    }
    schema
}

fn merge_with(old: &SchemaSet, discovered: SchemaSet) -> Vec<Schema> {
    let schema_enabled: BTreeMap<&str, bool> = old
        .schemas
        .iter()
        .map(|schema| (schema.name.as_str(), schema.enabled))
        .collect();
    let curated_tables: BTreeMap<(&str, &str), &Table> = old
        .schemas
        .iter()
        .flat_map(|schema| {
            schema
                .tables
                .iter()
                .map(move |table| ((schema.name.as_str(), table.name.as_str()), table))
        })
        .collect();

    discovered
        .schemas
        .into_iter()
        .map(|schema| {
            let enabled = schema_enabled
                .get(schema.name.as_str())
                .copied()
                .unwrap_or(false);
            let tables = schema
                .tables
                .into_iter()
                .map(|table| {
                    let curated = curated_tables
                        .get(&(schema.name.as_str(), table.name.as_str()))
                        .copied();
                    merge_table(curated, table)
                })
                .collect();
            Schema {
                name: schema.name,
                enabled,
                tables,
            }
        })
        .collect()
}

fn merge_table(curated: Option<&Table>, discovered: Table) -> Table {
    let Some(curated) = curated else {
        return Table {
            enabled: false,
            columns: discovered.columns.into_iter().map(enable_column).collect(),
            ..discovered
        };
    };

    if curated.columns.is_empty() {
        return Table {
            name: discovered.name,
            enabled: curated.enabled,
            description: pick_description(&curated.description, discovered.description),
            columns: discovered.columns.into_iter().map(enable_column).collect(),
        };
    }

    Table {
        name: curated.name.clone(),
        enabled: curated.enabled,
        description: pick_description(&curated.description, discovered.description),
        columns: curated.columns.clone(),
    }
}

fn enable_column(mut column: Column) -> Column {
    column.enabled = true;
    column
}

fn pick_description(curated: &str, discovered: String) -> String {
    if curated.trim().is_empty() {
        discovered
    } else {
        curated.to_string()
    }
}
