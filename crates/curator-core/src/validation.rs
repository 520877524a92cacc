use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::model::SchemaSet;

/// Validate internal consistency of a schema set before it is persisted.
///
/// This checks:
/// - duplicate schema names
/// - duplicate table names within a schema
/// - duplicate column names within a table
///
/// Relationship targets are name-only references and may point outside the set.
pub fn validate_schema_set(tree: &SchemaSet) -> Result<()> {
    let mut schemas = BTreeSet::new();

    for schema in &tree.schemas {
        if !schemas.insert(schema.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate schema name: {}",
                schema.name
            )));
        }

        let mut tables = BTreeSet::new();
        for table in &schema.tables {
            if !tables.insert(table.name.as_str()) {
                return Err(Error::InvalidSchema(format!(
                    "duplicate table name: {}.{}",
                    schema.name, table.name
                )));
            }

            let mut columns = BTreeSet::new();
            for column in &table.columns {
                if !columns.insert(column.name.as_str()) {
                    return Err(Error::InvalidSchema(format!(
                        "duplicate column name: {}.{}.{}",
                        schema.name, table.name, column.name
                    )));
                }
            }
        }
    }

    Ok(())
}
