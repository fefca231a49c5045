//! Schema loader: walks the already-parsed JSON tree and builds one
//! component per top-level entry.

use serde_json::Value;
use tracing::debug;

use crate::error::SchemaError;
use crate::model::{Component, Field, FieldType, IndexKind, IndexSpec, StoredProc};

/// Build the component list from a parsed schema document.
///
/// Best-effort policy: a malformed entry aborts the remaining entries of its
/// containing section, records one diagnostic, and processing continues with
/// the component's other sections and with the next component. Entries
/// already built are kept.
pub fn load_schema(tree: &Value) -> (Vec<Component>, Vec<SchemaError>) {
    let mut components = Vec::new();
    let mut errors = Vec::new();

    let Some(top) = tree.as_object() else {
        errors.push(SchemaError::RootNotObject);
        return (components, errors);
    };

    for (name, body) in top {
        let Some(sections) = body.as_object() else {
            errors.push(SchemaError::Malformed {
                component: name.clone(),
                section: "component".to_string(),
                detail: "component body must be an object".to_string(),
            });
            continue;
        };

        let mut component = Component::new(name);
        for (section, value) in sections {
            match section.as_str() {
                "fields" => load_fields(&mut component, value, &mut errors),
                "indices" => load_indices(&mut component, value, &mut errors),
                "stored_procs" => load_stored_procs(&mut component, value, &mut errors),
                // Unrecognized sections are ignored.
                _ => {}
            }
        }
        debug!(
            "loaded component `{}`: {} field(s), {} index(es), {} stored proc(s)",
            component.class_name,
            component.fields.len(),
            component.indices.len(),
            component.stored_procs.len()
        );
        components.push(component);
    }

    (components, errors)
}

fn malformed(component: &Component, section: &str, detail: String) -> SchemaError {
    SchemaError::Malformed {
        component: component.class_name.clone(),
        section: section.to_string(),
        detail,
    }
}

fn str_attr(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn load_fields(component: &mut Component, value: &Value, errors: &mut Vec<SchemaError>) {
    let Some(entries) = value.as_array() else {
        errors.push(malformed(component, "fields", "section must be an array".to_string()));
        return;
    };
    for entry in entries {
        match parse_field(component, entry) {
            Ok(field) => component.fields.push(field),
            Err(detail) => {
                errors.push(malformed(component, "fields", detail));
                return;
            }
        }
    }
}

fn parse_field(component: &Component, entry: &Value) -> Result<Field, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| "field entry must be an object".to_string())?;

    let name = str_attr(obj, "name").ok_or_else(|| "field entry is missing `name`".to_string())?;
    if component.field(&name).is_some() {
        return Err(format!("duplicate field `{name}`"));
    }

    let ty_raw =
        str_attr(obj, "type").ok_or_else(|| format!("field `{name}` is missing `type`"))?;
    let ty = FieldType::parse(&ty_raw)
        .ok_or_else(|| format!("field `{name}` has unrecognized type `{ty_raw}`"))?;

    // Non-numeric size defaults to zero — a structural leniency.
    let size = match obj.get("size") {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0) as usize,
        Some(Value::String(s)) => s.parse().unwrap_or(0),
        _ => 0,
    };

    let store_column = str_attr(obj, "db_name").unwrap_or_else(|| name.clone());
    let ref_name = str_attr(obj, "ref-name");

    Ok(Field {
        name,
        ty,
        size,
        store_column,
        ref_name,
    })
}

fn load_indices(component: &mut Component, value: &Value, errors: &mut Vec<SchemaError>) {
    let Some(entries) = value.as_array() else {
        errors.push(malformed(component, "indices", "section must be an array".to_string()));
        return;
    };
    for entry in entries {
        match parse_index(component, entry) {
            Ok(index) => component.indices.push(index),
            Err(detail) => {
                errors.push(malformed(component, "indices", detail));
                return;
            }
        }
    }
}

fn parse_index(component: &Component, entry: &Value) -> Result<IndexSpec, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| "index entry must be an object".to_string())?;

    let alias =
        str_attr(obj, "alias").ok_or_else(|| "index entry is missing `alias`".to_string())?;
    if component.indices.iter().any(|i| i.alias == alias) {
        return Err(format!("duplicate index alias `{alias}`"));
    }

    let kind_raw =
        str_attr(obj, "type").ok_or_else(|| format!("index `{alias}` is missing `type`"))?;
    let kind = IndexKind::parse(&kind_raw)
        .ok_or_else(|| format!("index `{alias}` has unrecognized kind `{kind_raw}`"))?;

    // Keys are read in document order; composite-key order is caller-
    // controlled by that order.
    let keys_obj = obj
        .get("keys")
        .and_then(Value::as_object)
        .ok_or_else(|| format!("index `{alias}` is missing `keys`"))?;
    let mut keys = Vec::new();
    for (field, ty_value) in keys_obj {
        let ty_raw = ty_value
            .as_str()
            .ok_or_else(|| format!("index `{alias}`: key `{field}` type must be a string"))?;
        let ty = FieldType::parse(ty_raw)
            .ok_or_else(|| format!("index `{alias}`: key `{field}` has unrecognized type `{ty_raw}`"))?;
        keys.push((field.clone(), ty));
    }
    if keys.is_empty() {
        return Err(format!("index `{alias}` has no keys"));
    }

    Ok(IndexSpec { kind, alias, keys })
}

fn load_stored_procs(component: &mut Component, value: &Value, errors: &mut Vec<SchemaError>) {
    let Some(entries) = value.as_array() else {
        errors.push(malformed(
            component,
            "stored_procs",
            "section must be an array".to_string(),
        ));
        return;
    };
    for entry in entries {
        match parse_stored_proc(entry) {
            Ok(proc) => component.insert_proc(proc),
            Err(detail) => {
                errors.push(malformed(component, "stored_procs", detail));
                return;
            }
        }
    }
}

fn parse_stored_proc(entry: &Value) -> Result<StoredProc, String> {
    let obj = entry
        .as_object()
        .ok_or_else(|| "stored procedure entry must be an object".to_string())?;

    let name = str_attr(obj, "name")
        .ok_or_else(|| "stored procedure entry is missing `name`".to_string())?;
    let kind =
        str_attr(obj, "type").ok_or_else(|| format!("stored procedure `{name}` is missing `type`"))?;

    let mut parameters = Vec::new();
    if let Some(params_obj) = obj.get("parameters").and_then(Value::as_object) {
        for (param, ty_value) in params_obj {
            let ty_raw = ty_value.as_str().ok_or_else(|| {
                format!("stored procedure `{name}`: parameter `{param}` type must be a string")
            })?;
            let ty = FieldType::parse(ty_raw).ok_or_else(|| {
                format!("stored procedure `{name}`: parameter `{param}` has unrecognized type `{ty_raw}`")
            })?;
            parameters.push((param.clone(), ty));
        }
    }

    Ok(StoredProc {
        kind,
        name,
        parameters,
    })
}
