//! Repository generator: emits, per component, a mutex-guarded in-memory
//! multi-indexed table with a load operation and one finder per index.
//!
//! Per index kind the table carries a `BTreeMap` (ordered) or `HashMap`
//! (hashed), keyed by the accessor results of the key fields — a composite
//! key becomes a tuple in declared key order. Unique indices replace on a
//! duplicate key (last insert wins); non-unique indices retain every row
//! position sharing a key.

use crate::emit;
use crate::error::GenError;
use crate::model::{Component, Field, IndexSpec};

/// Check the generation preconditions for one component's repository:
/// a `read` stored-procedure binding, and index keys that name declared,
/// key-eligible fields.
pub fn validate(component: &Component) -> Result<(), GenError> {
    if component.read_proc().is_none() {
        return Err(GenError::MissingReadBinding(component.class_name.clone()));
    }
    for index in &component.indices {
        for (key, _) in &index.keys {
            let Some(field) = component.field(key) else {
                return Err(GenError::UnknownKeyField {
                    component: component.class_name.clone(),
                    alias: index.alias.clone(),
                    field: key.clone(),
                });
            };
            if !field.ty.key_eligible() {
                return Err(GenError::UnsupportedKeyType {
                    component: component.class_name.clone(),
                    alias: index.alias.clone(),
                    field: key.clone(),
                });
            }
        }
    }
    Ok(())
}

/// Emit the repository for one component.
pub fn generate(component: &Component) -> Result<String, GenError> {
    validate(component)?;
    let read = component
        .read_proc()
        .ok_or_else(|| GenError::MissingReadBinding(component.class_name.clone()))?;

    let name = emit::type_name(&component.class_name);
    let map_name = format!("{name}Map");
    let table_name = format!("{name}Table");

    let mut out = String::new();

    out.push_str(&format!(
        "/// In-memory multi-indexed table of `{name}` rows.\n///\n/// One mutex guards `load` and every finder: a finder that begins after a\n/// successful `load` observes every row of that load, and a finder racing a\n/// load blocks until the load releases the lock.\npub struct {map_name} {{\n    inner: Mutex<{table_name}>,\n}}\n\n"
    ));

    out.push_str(&table_decl(component, &name, &table_name));
    out.push_str(&map_impl(component, &name, &map_name, &table_name, &read.name));
    out.push_str(&format!(
        "impl Default for {map_name} {{\n    fn default() -> Self {{\n        Self::new()\n    }}\n}}\n\n"
    ));

    Ok(out)
}

/// Declared field for an index key. `validate` guarantees presence.
fn key_fields<'a>(component: &'a Component, index: &IndexSpec) -> Vec<&'a Field> {
    index
        .keys
        .iter()
        .filter_map(|(key, _)| component.field(key))
        .collect()
}

/// Rust key type of an index: the single key's type, or a tuple in declared
/// key order.
fn key_type(component: &Component, index: &IndexSpec) -> String {
    let types: Vec<&str> = key_fields(component, index)
        .iter()
        .map(|f| f.ty.rust_type())
        .collect();
    if types.len() == 1 {
        types[0].to_string()
    } else {
        format!("({})", types.join(", "))
    }
}

fn map_type(component: &Component, index: &IndexSpec) -> String {
    let map = if index.kind.is_ordered() {
        "BTreeMap"
    } else {
        "HashMap"
    };
    let value = if index.kind.is_unique() {
        "usize".to_string()
    } else {
        "Vec<usize>".to_string()
    };
    format!("{map}<{}, {value}>", key_type(component, index))
}

fn table_decl(component: &Component, name: &str, table_name: &str) -> String {
    let mut out = String::new();
    out.push_str("#[derive(Default)]\n");
    out.push_str(&format!("struct {table_name} {{\n"));
    let width = emit::widest(
        std::iter::once("rows").chain(component.indices.iter().map(|i| i.alias.as_str())),
    );
    out.push_str(&emit::member("rows", &format!("Vec<Arc<{name}>>"), width));
    for index in &component.indices {
        out.push_str(&emit::member(
            &index.alias,
            &map_type(component, index),
            width,
        ));
    }
    out.push_str("}\n\n");
    out
}

/// Index key built from accessor results of the inserted row.
fn insert_key_expr(component: &Component, index: &IndexSpec) -> String {
    let parts: Vec<String> = key_fields(component, index)
        .iter()
        .map(|f| {
            if f.ty.is_text() {
                format!("row.{}().to_string()", f.name)
            } else {
                format!("row.{}()", f.name)
            }
        })
        .collect();
    if parts.len() == 1 {
        parts[0].clone()
    } else {
        format!("({})", parts.join(", "))
    }
}

/// Lookup key built from finder parameters.
fn lookup_key_expr(component: &Component, index: &IndexSpec) -> String {
    let fields = key_fields(component, index);
    if let [field] = fields.as_slice() {
        if field.ty.is_text() {
            // Maps keyed by String look up by `&str` directly.
            return field.name.clone();
        }
        return format!("&{}", field.name);
    }
    let parts: Vec<String> = fields
        .iter()
        .map(|f| {
            if f.ty.is_text() {
                format!("{}.to_string()", f.name)
            } else {
                f.name.clone()
            }
        })
        .collect();
    format!("&({})", parts.join(", "))
}

fn map_impl(
    component: &Component,
    name: &str,
    map_name: &str,
    table_name: &str,
    read_proc: &str,
) -> String {
    let mut methods = Vec::new();

    methods.push(format!(
        "    pub fn new() -> Self {{\n        Self {{\n            inner: Mutex::new({table_name}::default()),\n        }}\n    }}"
    ));

    let mut load = String::new();
    load.push_str(
        "    /// Issue the `read` procedure and append every fetched row to all\n    /// indices. The lock spans the whole load. Rows inserted before a failed\n    /// fetch are kept, so treat a failed load as state unknown.\n",
    );
    load.push_str(
        "    pub fn load(&self, conn: &mut dyn Connection) -> Result<(), StoreError> {\n",
    );
    load.push_str("        let mut table = self.inner.lock().unwrap();\n");
    load.push_str(&format!("        conn.execute(\"exec {read_proc}\")?;\n"));
    load.push_str(&format!("        let binding = {name}Binding::new();\n"));
    load.push_str("        binding.bind(conn)?;\n");
    load.push_str("        while conn.next_row()? {\n");
    load.push_str("            let row = Arc::new(binding.snapshot());\n");
    load.push_str("            let at = table.rows.len();\n");
    load.push_str("            table.rows.push(Arc::clone(&row));\n");
    for index in &component.indices {
        let key = insert_key_expr(component, index);
        if index.kind.is_unique() {
            load.push_str(&format!(
                "            table.{}.insert({key}, at);\n",
                index.alias
            ));
        } else {
            load.push_str(&format!(
                "            table.{}.entry({key}).or_default().push(at);\n",
                index.alias
            ));
        }
    }
    load.push_str("        }\n");
    load.push_str("        Ok(())\n");
    load.push_str("    }");
    methods.push(load);

    for index in &component.indices {
        let finder = emit::finder_name(&index.alias);
        let params: Vec<String> = key_fields(component, index)
            .iter()
            .map(|f| format!("{}: {}", f.name, f.ty.param_type()))
            .collect();
        let lookup = lookup_key_expr(component, index);
        let fetch = if index.kind.is_unique() {
            format!("let at = *table.{}.get({lookup})?;", index.alias)
        } else {
            // Non-unique: one arbitrarily chosen match.
            format!("let at = *table.{}.get({lookup})?.first()?;", index.alias)
        };
        methods.push(format!(
            "    pub fn {finder}(&self, {}) -> Option<Arc<{name}>> {{\n        let table = self.inner.lock().unwrap();\n        {fetch}\n        Some(Arc::clone(&table.rows[at]))\n    }}",
            params.join(", ")
        ));
    }

    format!("impl {map_name} {{\n{}\n}}\n\n", methods.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Field, FieldType, IndexKind, StoredProc};

    fn field(name: &str, ty: FieldType) -> Field {
        Field {
            name: name.to_string(),
            ty,
            size: if ty.is_text() { 8 } else { 0 },
            store_column: name.to_string(),
            ref_name: None,
        }
    }

    fn index(kind: IndexKind, alias: &str, keys: &[(&str, FieldType)]) -> IndexSpec {
        IndexSpec {
            kind,
            alias: alias.to_string(),
            keys: keys.iter().map(|(n, t)| (n.to_string(), *t)).collect(),
        }
    }

    fn read_proc(name: &str) -> StoredProc {
        StoredProc {
            kind: "read".to_string(),
            name: name.to_string(),
            parameters: Vec::new(),
        }
    }

    fn rate() -> Component {
        let mut component = Component::new("rate");
        component.fields.push(field("id", FieldType::Int));
        component.fields.push(field("code", FieldType::Text));
        component
            .indices
            .push(index(IndexKind::OrderedUnique, "by_id", &[("id", FieldType::Int)]));
        component.insert_proc(read_proc("sp_read_rate"));
        component
    }

    #[test]
    fn missing_read_binding_is_fatal() {
        let mut component = rate();
        component.stored_procs.clear();
        assert_eq!(
            validate(&component),
            Err(GenError::MissingReadBinding("rate".to_string()))
        );
    }

    #[test]
    fn unknown_key_field_is_rejected() {
        let mut component = rate();
        component
            .indices
            .push(index(IndexKind::HashedUnique, "by_ghost", &[("ghost", FieldType::Int)]));
        assert!(matches!(
            validate(&component),
            Err(GenError::UnknownKeyField { .. })
        ));
    }

    #[test]
    fn float_key_field_is_rejected() {
        let mut component = rate();
        component.fields.push(field("value", FieldType::Double));
        component
            .indices
            .push(index(IndexKind::OrderedUnique, "by_value", &[("value", FieldType::Double)]));
        assert!(matches!(
            validate(&component),
            Err(GenError::UnsupportedKeyType { .. })
        ));
    }

    #[test]
    fn load_issues_the_read_procedure_under_the_lock() {
        let text = generate(&rate()).unwrap();
        assert!(text.contains("let mut table = self.inner.lock().unwrap();"));
        assert!(text.contains("conn.execute(\"exec sp_read_rate\")?;"));
        assert!(text.contains("while conn.next_row()? {"));
    }

    #[test]
    fn ordered_unique_index_uses_a_btree_map() {
        let text = generate(&rate()).unwrap();
        assert!(text.contains("by_id: BTreeMap<i32, usize>"));
        assert!(text.contains("table.by_id.insert(row.id(), at);"));
        assert!(text.contains("pub fn find_by_id(&self, id: i32) -> Option<Arc<Rate>>"));
        assert!(text.contains("let at = *table.by_id.get(&id)?;"));
    }

    #[test]
    fn hashed_non_unique_index_retains_all_positions() {
        let mut component = rate();
        component
            .indices
            .push(index(IndexKind::HashedNonUnique, "by_code", &[("code", FieldType::Text)]));
        let text = generate(&component).unwrap();
        assert!(text.contains("by_code: HashMap<String, Vec<usize>>"));
        assert!(text.contains("table.by_code.entry(row.code().to_string()).or_default().push(at);"));
        assert!(text.contains("let at = *table.by_code.get(code)?.first()?;"));
    }

    #[test]
    fn composite_finder_parameters_follow_declared_key_order() {
        let mut component = rate();
        component.indices.push(index(
            IndexKind::OrderedUnique,
            "by_code_id",
            &[("code", FieldType::Text), ("id", FieldType::Int)],
        ));
        let text = generate(&component).unwrap();
        assert!(text.contains("by_code_id: BTreeMap<(String, i32), usize>"));
        assert!(text.contains(
            "table.by_code_id.insert((row.code().to_string(), row.id()), at);"
        ));
        assert!(text.contains(
            "pub fn find_by_code_id(&self, code: &str, id: i32) -> Option<Arc<Rate>>"
        ));
        assert!(text.contains("table.by_code_id.get(&(code.to_string(), id))?;"));
    }

    #[test]
    fn repository_type_is_caller_owned() {
        let text = generate(&rate()).unwrap();
        assert!(text.contains("pub struct RateMap"));
        assert!(text.contains("pub fn new() -> Self"));
        // No hidden global state.
        assert!(!text.contains("static"));
    }
}
