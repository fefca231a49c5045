//! Schema model: pure data built once by the loader and handed by reference
//! to the generators.

use std::collections::BTreeMap;

/// Recognized field and parameter types. Exactly one text type; everything
/// else is a by-value scalar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Int,
    Long,
    Float,
    Double,
    Bool,
}

impl FieldType {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "text" => Some(Self::Text),
            "int" => Some(Self::Int),
            "long" => Some(Self::Long),
            "float" => Some(Self::Float),
            "double" => Some(Self::Double),
            "bool" => Some(Self::Bool),
            _ => None,
        }
    }

    pub fn is_text(self) -> bool {
        self == Self::Text
    }

    /// Member type in the generated value struct.
    pub fn rust_type(self) -> &'static str {
        match self {
            Self::Text => "String",
            Self::Int => "i32",
            Self::Long => "i64",
            Self::Float => "f32",
            Self::Double => "f64",
            Self::Bool => "bool",
        }
    }

    /// Parameter type in generated signatures: text by reference, scalars by
    /// value.
    pub fn param_type(self) -> &'static str {
        match self {
            Self::Text => "&str",
            other => other.rust_type(),
        }
    }

    /// Zero-argument construction value.
    pub fn default_expr(self) -> &'static str {
        match self {
            Self::Text => "String::new()",
            Self::Int | Self::Long => "0",
            Self::Float | Self::Double => "0.0",
            Self::Bool => "false",
        }
    }

    /// Binding slot type in the generated binding descriptor.
    pub fn slot_type(self) -> String {
        match self {
            Self::Text => "TextSlot".to_string(),
            other => format!("ScalarSlot<{}>", other.rust_type()),
        }
    }

    /// `BindTarget` variant name for this type.
    pub fn bind_variant(self) -> &'static str {
        match self {
            Self::Text => "Text",
            Self::Int => "Int",
            Self::Long => "Long",
            Self::Float => "Float",
            Self::Double => "Double",
            Self::Bool => "Bool",
        }
    }

    /// Whether the type can key an index. Floating-point fields cannot:
    /// `f32`/`f64` are neither `Ord` nor `Hash`.
    pub fn key_eligible(self) -> bool {
        !matches!(self, Self::Float | Self::Double)
    }
}

/// One declared field. Declaration order fixes constructor-parameter order
/// and member layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub ty: FieldType,
    /// Capacity hint, meaningful only for text fields. Zero means unbounded.
    pub size: usize,
    /// Backing-store column bound for this field.
    pub store_column: String,
    /// Cross-reference hint, carried through but unused by generation.
    pub ref_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    OrderedUnique,
    OrderedNonUnique,
    HashedUnique,
    HashedNonUnique,
}

impl IndexKind {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "ordered-unique" => Some(Self::OrderedUnique),
            "ordered-non-unique" => Some(Self::OrderedNonUnique),
            "hashed-unique" => Some(Self::HashedUnique),
            "hashed-non-unique" => Some(Self::HashedNonUnique),
            _ => None,
        }
    }

    pub fn is_ordered(self) -> bool {
        matches!(self, Self::OrderedUnique | Self::OrderedNonUnique)
    }

    pub fn is_unique(self) -> bool {
        matches!(self, Self::OrderedUnique | Self::HashedUnique)
    }
}

/// One declared index. Key order defines composite-key tuple order and the
/// parameter order of the generated finder.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSpec {
    pub kind: IndexKind,
    pub alias: String,
    pub keys: Vec<(String, FieldType)>,
}

impl IndexSpec {
    pub fn is_composite(&self) -> bool {
        self.keys.len() > 1
    }
}

/// Association between an operation role (e.g. `read`) and a backing-store
/// procedure plus its ordered parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredProc {
    pub kind: String,
    pub name: String,
    pub parameters: Vec<(String, FieldType)>,
}

/// One schema component: a record type plus its fields, indices, and
/// procedure bindings.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub class_name: String,
    pub fields: Vec<Field>,
    pub indices: Vec<IndexSpec>,
    pub stored_procs: BTreeMap<String, StoredProc>,
}

impl Component {
    pub fn new(class_name: &str) -> Self {
        Self {
            class_name: class_name.to_string(),
            fields: Vec::new(),
            indices: Vec::new(),
            stored_procs: BTreeMap::new(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Insert a stored-procedure binding; a later binding of the same kind
    /// overwrites the earlier one.
    pub fn insert_proc(&mut self, proc: StoredProc) {
        self.stored_procs.insert(proc.kind.clone(), proc);
    }

    pub fn read_proc(&self) -> Option<&StoredProc> {
        self.stored_procs.get("read")
    }
}
