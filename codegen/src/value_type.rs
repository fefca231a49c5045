//! Value-type generator: emits, per component, the record struct with
//! constructors, accessors, mutators, and the column-binding descriptor.

use crate::emit;
use crate::model::{Component, Field};

/// Emit the value type for one component. Purely a function of the model; no
/// side effects beyond the returned text.
pub fn generate(component: &Component) -> String {
    let name = emit::type_name(&component.class_name);
    let mut out = String::new();

    out.push_str(&struct_decl(component, &name));
    out.push_str(&default_impl(component, &name));
    out.push_str(&value_impl(component, &name));
    out.push_str(&binding_decl(component, &name));
    out.push_str(&binding_impl(component, &name));

    out
}

fn struct_decl(component: &Component, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "/// Value type for component `{}`.\n",
        component.class_name
    ));
    out.push_str("#[derive(Debug, Clone, PartialEq)]\n");
    out.push_str(&format!("pub struct {name} {{\n"));
    let width = emit::widest(component.fields.iter().map(|f| f.name.as_str()));
    for field in &component.fields {
        out.push_str(&emit::member(&field.name, field.ty.rust_type(), width));
    }
    out.push_str("}\n\n");
    out
}

fn default_impl(component: &Component, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!("impl Default for {name} {{\n"));
    out.push_str("    fn default() -> Self {\n");
    out.push_str("        Self {\n");
    for field in &component.fields {
        out.push_str(&format!(
            "            {}: {},\n",
            field.name,
            field.ty.default_expr()
        ));
    }
    out.push_str("        }\n");
    out.push_str("    }\n");
    out.push_str("}\n\n");
    out
}

fn param_list(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| format!("{}: {}", f.name, f.ty.param_type()))
        .collect::<Vec<_>>()
        .join(", ")
}

fn value_impl(component: &Component, name: &str) -> String {
    let mut methods = Vec::new();

    // Full constructor, one parameter per field in declaration order.
    let mut ctor = String::new();
    ctor.push_str("    /// Construct from field values, in declaration order.\n");
    ctor.push_str(&format!(
        "    pub fn new({}) -> Self {{\n",
        param_list(&component.fields)
    ));
    ctor.push_str("        Self {\n");
    for field in &component.fields {
        if field.ty.is_text() {
            ctor.push_str(&format!("            {0}: {0}.to_string(),\n", field.name));
        } else {
            ctor.push_str(&format!("            {},\n", field.name));
        }
    }
    ctor.push_str("        }\n");
    ctor.push_str("    }");
    methods.push(ctor);

    methods.push(format!(
        "    /// Fresh column bindings for this component's store columns.\n    pub fn binding() -> {name}Binding {{\n        {name}Binding::new()\n    }}"
    ));

    for field in &component.fields {
        if field.ty.is_text() {
            methods.push(format!(
                "    pub fn {0}(&self) -> &str {{\n        &self.{0}\n    }}",
                field.name
            ));
        } else {
            methods.push(format!(
                "    pub fn {0}(&self) -> {1} {{\n        self.{0}\n    }}",
                field.name,
                field.ty.rust_type()
            ));
        }
    }

    for field in &component.fields {
        if field.ty.is_text() {
            methods.push(format!(
                "    pub fn set_{0}(&mut self, {0}: &str) {{\n        self.{0} = {0}.to_string();\n    }}",
                field.name
            ));
        } else {
            methods.push(format!(
                "    pub fn set_{0}(&mut self, {0}: {1}) {{\n        self.{0} = {0};\n    }}",
                field.name,
                field.ty.rust_type()
            ));
        }
    }

    format!("impl {name} {{\n{}\n}}\n\n", methods.join("\n\n"))
}

fn binding_decl(component: &Component, name: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "/// Scratch row for `{name}`: one writable slot per store column.\n"
    ));
    out.push_str(&format!("pub struct {name}Binding {{\n"));
    let width = emit::widest(component.fields.iter().map(|f| f.name.as_str()));
    for field in &component.fields {
        out.push_str(&emit::member(&field.name, &field.ty.slot_type(), width));
    }
    out.push_str("}\n\n");
    out
}

fn binding_impl(component: &Component, name: &str) -> String {
    let mut methods = Vec::new();

    let mut ctor = String::new();
    ctor.push_str("    pub fn new() -> Self {\n");
    ctor.push_str("        Self {\n");
    for field in &component.fields {
        if field.ty.is_text() {
            ctor.push_str(&format!(
                "            {}: TextSlot::with_capacity({}),\n",
                field.name, field.size
            ));
        } else {
            ctor.push_str(&format!(
                "            {}: ScalarSlot::new({}),\n",
                field.name,
                field.ty.default_expr()
            ));
        }
    }
    ctor.push_str("        }\n");
    ctor.push_str("    }");
    methods.push(ctor);

    let mut bind = String::new();
    bind.push_str(
        "    /// Register every store column with the connection. After each\n    /// successful `next_row`, `snapshot` reflects the fetched row.\n",
    );
    bind.push_str("    pub fn bind(&self, conn: &mut dyn Connection) -> Result<(), StoreError> {\n");
    for field in &component.fields {
        bind.push_str(&format!(
            "        conn.bind_column(\"{}\", BindTarget::{}(self.{}.clone()))?;\n",
            field.store_column,
            field.ty.bind_variant(),
            field.name
        ));
    }
    bind.push_str("        Ok(())\n");
    bind.push_str("    }");
    methods.push(bind);

    let snapshot_args = component
        .fields
        .iter()
        .map(|f| {
            if f.ty.is_text() {
                format!("&self.{}.get()", f.name)
            } else {
                format!("self.{}.get()", f.name)
            }
        })
        .collect::<Vec<_>>()
        .join(", ");
    methods.push(format!(
        "    /// Materialize the currently fetched row as a value.\n    pub fn snapshot(&self) -> {name} {{\n        {name}::new({snapshot_args})\n    }}"
    ));

    let mut out = format!("impl {name}Binding {{\n{}\n}}\n\n", methods.join("\n\n"));
    out.push_str(&format!(
        "impl Default for {name}Binding {{\n    fn default() -> Self {{\n        Self::new()\n    }}\n}}\n\n"
    ));
    out
}
