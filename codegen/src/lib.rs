//! dbmap code generator.
//!
//! Loads a JSON component schema into an in-memory model and emits, per
//! component, a value type plus an in-memory multi-indexed repository, as one
//! generated source unit depending only on `dbmap-store`.

pub mod emit;
pub mod error;
pub mod loader;
pub mod model;
pub mod repository;
pub mod value_type;

use error::GenError;
use model::Component;

/// Generate one output unit: a header, the imports the surviving components
/// need, then per component the value type followed by its repository.
///
/// A component whose repository fails validation still contributes its value
/// type; the error is returned and the next component proceeds.
pub fn generate_unit(components: &[Component]) -> (String, Vec<GenError>) {
    let mut errors = Vec::new();

    let mut out = String::from("// @generated by dbmap-codegen. Do not edit.\n\n");
    if components.is_empty() {
        return (out, errors);
    }

    let repo_ok: Vec<bool> = components
        .iter()
        .map(|component| match repository::validate(component) {
            Ok(()) => true,
            Err(err) => {
                errors.push(err);
                false
            }
        })
        .collect();

    let with_repo = || {
        components
            .iter()
            .zip(&repo_ok)
            .filter(|(_, ok)| **ok)
            .map(|(c, _)| c)
    };
    let any_repo = with_repo().next().is_some();
    let ordered = with_repo().any(|c| c.indices.iter().any(|i| i.kind.is_ordered()));
    let hashed = with_repo().any(|c| c.indices.iter().any(|i| !i.kind.is_ordered()));

    match (ordered, hashed) {
        (true, true) => out.push_str("use std::collections::{BTreeMap, HashMap};\n"),
        (true, false) => out.push_str("use std::collections::BTreeMap;\n"),
        (false, true) => out.push_str("use std::collections::HashMap;\n"),
        (false, false) => {}
    }
    if any_repo {
        out.push_str("use std::sync::{Arc, Mutex};\n");
    }
    if ordered || hashed || any_repo {
        out.push('\n');
    }

    let any_text = components.iter().any(|c| c.fields.iter().any(|f| f.ty.is_text()));
    let any_scalar = components.iter().any(|c| c.fields.iter().any(|f| !f.ty.is_text()));
    let mut store_names = Vec::new();
    if any_text || any_scalar {
        store_names.push("BindTarget");
    }
    store_names.push("Connection");
    if any_scalar {
        store_names.push("ScalarSlot");
    }
    store_names.push("StoreError");
    if any_text {
        store_names.push("TextSlot");
    }
    out.push_str(&format!(
        "use dbmap_store::{{{}}};\n\n",
        store_names.join(", ")
    ));

    for (component, ok) in components.iter().zip(&repo_ok) {
        out.push_str(&value_type::generate(component));
        if *ok {
            match repository::generate(component) {
                Ok(text) => out.push_str(&text),
                Err(err) => errors.push(err),
            }
        }
    }

    (out, errors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::{Field, FieldType, IndexKind, IndexSpec, StoredProc};

    fn component(name: &str, with_read: bool) -> Component {
        let mut c = Component::new(name);
        c.fields.push(Field {
            name: "id".to_string(),
            ty: FieldType::Int,
            size: 0,
            store_column: "id".to_string(),
            ref_name: None,
        });
        c.indices.push(IndexSpec {
            kind: IndexKind::OrderedUnique,
            alias: "by_id".to_string(),
            keys: vec![("id".to_string(), FieldType::Int)],
        });
        if with_read {
            c.insert_proc(StoredProc {
                kind: "read".to_string(),
                name: format!("sp_read_{name}"),
                parameters: Vec::new(),
            });
        }
        c
    }

    #[test]
    fn value_type_survives_a_failed_repository() {
        let components = vec![component("good", true), component("bad", false)];
        let (unit, errors) = generate_unit(&components);

        assert_eq!(errors, vec![GenError::MissingReadBinding("bad".to_string())]);
        assert!(unit.contains("pub struct Good"));
        assert!(unit.contains("pub struct GoodMap"));
        assert!(unit.contains("pub struct Bad"));
        assert!(!unit.contains("pub struct BadMap"));
    }

    #[test]
    fn imports_match_the_index_kinds_in_use() {
        let (unit, _) = generate_unit(&[component("rate", true)]);
        assert!(unit.contains("use std::collections::BTreeMap;\n"));
        assert!(!unit.contains("HashMap"));
        assert!(unit.contains("use std::sync::{Arc, Mutex};\n"));
        assert!(unit.contains("use dbmap_store::{BindTarget, Connection, ScalarSlot, StoreError};\n"));
    }

    #[test]
    fn empty_schema_yields_only_the_header() {
        let (unit, errors) = generate_unit(&[]);
        assert!(errors.is_empty());
        assert_eq!(unit, "// @generated by dbmap-codegen. Do not edit.\n\n");
    }
}
