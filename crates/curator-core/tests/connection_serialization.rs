use curator_core::{Column, Connection, Relationship, Schema, SchemaSet, Table};
use serde_json::json;
use uuid::Uuid;

fn connection() -> Connection {
    Connection {
        id: Uuid::nil(),
        name: "shop".to_string(),
        dsn: "postgresql://reader@localhost/shop".to_string(),
        database: Some("shop".to_string()),
        dialect: Some("postgresql".to_string()),
        connection_type: Some("postgres".to_string()),
        is_sample: false,
        options: SchemaSet::new(vec![Schema {
            name: "public".to_string(),
            enabled: true,
            tables: vec![Table {
                name: "users".to_string(),
                enabled: true,
                description: String::new(),
                columns: vec![Column {
                    name: "id".to_string(),
                    column_type: "integer".to_string(),
                    enabled: true,
                    primary_key: true,
                    relationship: vec![Relationship::new("public", "orders", "user_id", true)],
                    ..Column::default()
                }],
            }],
        }]),
    }
}

#[test]
fn serializes_connection_with_wire_field_names() {
    let value = serde_json::to_value(connection()).expect("serialize connection");

    let expected = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "name": "shop",
        "dsn": "postgresql://reader@localhost/shop",
        "database": "shop",
        "dialect": "postgresql",
        "type": "postgres",
        "is_sample": false,
        "options": {
            "schemas": [{
                "name": "public",
                "enabled": true,
                "tables": [{
                    "name": "users",
                    "enabled": true,
                    "description": "",
                    "columns": [{
                        "name": "id",
                        "description": "",
                        "type": "integer",
                        "enabled": true,
                        "primary_key": true,
                        "possible_values": [],
                        "relationship": [{
                            "enabled": true,
                            "schema_name": "public",
                            "table": "orders",
                            "column": "user_id"
                        }]
                    }]
                }]
            }]
        }
    });
    assert_eq!(value, expected);
}

#[test]
fn sparse_payload_fills_defaults_and_keeps_unknown_fields() {
    let payload = json!({
        "id": "00000000-0000-0000-0000-000000000000",
        "name": "titanic",
        "dsn": "sqlite:///data/titanic.sqlite",
        "options": {
            "schemas": [{
                "name": "main",
                "enabled": false,
                "tables": [{
                    "name": "passengers",
                    "enabled": true,
                    "columns": [{ "name": "survived", "reverse_look_up": true }]
                }]
            }]
        }
    });

    let connection: Connection = serde_json::from_value(payload).expect("deserialize");
    let column = &connection.options.schemas[0].tables[0].columns[0];

    assert_eq!(column.name, "survived");
    assert!(!column.enabled);
    assert!(column.possible_values.is_empty());
    assert!(column.relationship.is_empty());
    assert_eq!(column.extra.get("reverse_look_up"), Some(&json!(true)));
    assert_eq!(connection.database, None);
    assert!(!connection.is_sample);
}
