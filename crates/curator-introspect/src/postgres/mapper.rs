use curator_core::{Column, Relationship, Table};

use crate::options::DiscoverOptions;

use super::queries::{RawColumn, RawRelationship, RawTable};

pub fn filter_schemas(raw: Vec<String>, opts: &DiscoverOptions) -> Vec<String> {
    raw.into_iter()
        .filter(|schema| {
            let is_system = schema.starts_with("pg_") || schema == "information_schema";
            match &opts.schemas {
                Some(list) => list.iter().any(|item| item == schema),
                None => opts.include_system_schemas || !is_system,
            }
        })
        .collect()
}

pub fn map_tables(raw: Vec<RawTable>, opts: &DiscoverOptions) -> Vec<Table> {
    raw.into_iter()
        .filter(|table| opts.include_views || !is_view(&table.relkind))
        .map(|table| Table {
            name: table.name,
            enabled: false,
            description: described(table.comment, opts),
            columns: Vec::new(),
        })
        .collect()
}

fn is_view(relkind: &str) -> bool {
    matches!(relkind, "v" | "m")
}

pub fn map_columns(raw: Vec<RawColumn>, opts: &DiscoverOptions) -> Vec<Column> {
    raw.into_iter()
        .map(|column| Column {
            name: column.name,
            column_type: column.data_type,
            primary_key: column.is_primary_key,
            description: described(column.comment, opts),
            ..Column::default()
        })
        .collect()
}

/// Declared keys are reported enabled; curators can switch them off.
pub fn map_relationships(raw: Vec<RawRelationship>) -> Vec<Relationship> {
    raw.into_iter()
        .map(|edge| Relationship::new(edge.schema_name, edge.table, edge.column, true))
        .collect()
}

fn described(comment: Option<String>, opts: &DiscoverOptions) -> String {
    if opts.include_comments {
        comment.unwrap_or_default()
    } else {
        String::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table(name: &str, relkind: &str) -> RawTable {
        RawTable {
            name: name.to_string(),
            relkind: relkind.to_string(),
            comment: Some(format!("{name} comment")),
        }
    }

    #[test]
    fn system_schemas_are_skipped_by_default() {
        let raw = vec![
            "information_schema".to_string(),
            "pg_catalog".to_string(),
            "public".to_string(),
        ];
        assert_eq!(filter_schemas(raw.clone(), &DiscoverOptions::default()), vec!["public"]);

        let explicit = DiscoverOptions {
            schemas: Some(vec!["pg_catalog".to_string()]),
            ..DiscoverOptions::default()
        };
        assert_eq!(filter_schemas(raw, &explicit), vec!["pg_catalog"]);
    }

    #[test]
    fn views_and_comments_follow_options() {
        let raw = vec![raw_table("users", "r"), raw_table("active_users", "v")];
        let opts = DiscoverOptions {
            include_views: false,
            include_comments: false,
            ..DiscoverOptions::default()
        };

        let tables = map_tables(raw, &opts);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].name, "users");
        assert_eq!(tables[0].description, "");
        assert!(!tables[0].enabled);
    }

    #[test]
    fn columns_carry_type_and_key() {
        let columns = map_columns(
            vec![RawColumn {
                name: "id".to_string(),
                data_type: "integer".to_string(),
                is_primary_key: true,
                comment: Some("surrogate key".to_string()),
            }],
            &DiscoverOptions::default(),
        );

        assert_eq!(columns[0].column_type, "integer");
        assert!(columns[0].primary_key);
        assert_eq!(columns[0].description, "surrogate key");
        assert!(columns[0].possible_values.is_empty());
    }
}
