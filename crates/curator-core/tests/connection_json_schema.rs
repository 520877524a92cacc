use curator_core::Connection;
use jsonschema::JSONSchema;
use schemars::schema_for;
use serde_json::json;

fn compiled() -> JSONSchema {
    let schema = serde_json::to_value(schema_for!(Connection)).expect("serialize json schema");
    JSONSchema::compile(&schema).expect("compile json schema")
}

#[test]
fn stored_connection_conforms_to_generated_schema() {
    let instance = json!({
        "id": "6f1c1c1e-9d7b-4b7e-9a55-2d1f1d7f2a10",
        "name": "dvd rental",
        "dsn": "postgresql://reader@localhost/dvdrental",
        "options": {
            "schemas": [{
                "name": "public",
                "enabled": true,
                "tables": [{
                    "name": "film",
                    "enabled": true,
                    "description": "catalogue of films",
                    "columns": [{
                        "name": "rating",
                        "type": "mpaa_rating",
                        "enabled": true,
                        "possible_values": ["G", "PG", "R"]
                    }]
                }]
            }]
        }
    });

    assert!(compiled().is_valid(&instance));
}

#[test]
fn schema_rejects_missing_table_flag() {
    let instance = json!({
        "id": "6f1c1c1e-9d7b-4b7e-9a55-2d1f1d7f2a10",
        "name": "dvd rental",
        "dsn": "postgresql://reader@localhost/dvdrental",
        "options": {
            "schemas": [{
                "name": "public",
                "enabled": true,
                "tables": [{ "name": "film" }]
            }]
        }
    });

    assert!(!compiled().is_valid(&instance));
}
