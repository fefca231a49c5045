//! End-to-end: JSON schema document -> loader -> generated unit.

use pretty_assertions::assert_eq;

use dbmap_codegen::{generate_unit, loader};

const RATE_SCHEMA: &str = r#"
{
  "rate": {
    "fields": [
      {"name": "id",   "type": "int",  "db_name": "id"},
      {"name": "code", "type": "text", "size": 8, "db_name": "code"}
    ],
    "indices": [
      {"type": "ordered-unique", "alias": "by_id", "keys": {"id": "int"}}
    ],
    "stored_procs": [
      {"name": "sp_read_rate", "type": "read", "parameters": {}}
    ]
  }
}
"#;

#[test]
fn generates_value_type_and_repository_for_the_rate_schema() {
    let tree: serde_json::Value = serde_json::from_str(RATE_SCHEMA).unwrap();
    let (components, schema_errors) = loader::load_schema(&tree);
    assert!(schema_errors.is_empty());
    assert_eq!(components.len(), 1);

    let (unit, gen_errors) = generate_unit(&components);
    assert!(gen_errors.is_empty());

    let header: Vec<&str> = unit.lines().take(6).collect();
    assert_eq!(
        header,
        vec![
            "// @generated by dbmap-codegen. Do not edit.",
            "",
            "use std::collections::BTreeMap;",
            "use std::sync::{Arc, Mutex};",
            "",
            "use dbmap_store::{BindTarget, Connection, ScalarSlot, StoreError, TextSlot};",
        ]
    );

    // Value type.
    assert!(unit.contains("pub struct Rate {"));
    assert!(unit.contains("pub fn new(id: i32, code: &str) -> Self"));
    assert!(unit.contains("pub fn code(&self) -> &str"));
    assert!(unit.contains("pub fn set_code(&mut self, code: &str)"));
    assert!(unit.contains("code: TextSlot::with_capacity(8),"));

    // Repository.
    assert!(unit.contains("pub struct RateMap {"));
    assert!(unit.contains("conn.execute(\"exec sp_read_rate\")?;"));
    assert!(unit.contains("pub fn find_by_id(&self, id: i32) -> Option<Arc<Rate>>"));
}

#[test]
fn component_without_read_binding_keeps_its_value_type() {
    let schema = r#"
    {
      "lonely": {
        "fields": [
          {"name": "id", "type": "long", "db_name": "id"}
        ],
        "indices": [
          {"type": "hashed-unique", "alias": "by_id", "keys": {"id": "long"}}
        ]
      }
    }
    "#;
    let tree: serde_json::Value = serde_json::from_str(schema).unwrap();
    let (components, schema_errors) = loader::load_schema(&tree);
    assert!(schema_errors.is_empty());

    let (unit, gen_errors) = generate_unit(&components);
    assert_eq!(gen_errors.len(), 1);
    assert!(gen_errors[0]
        .to_string()
        .contains("no stored procedure bound as `read`"));

    assert!(unit.contains("pub struct Lonely {"));
    assert!(!unit.contains("LonelyMap"));
}
