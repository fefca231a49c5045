use crate::error::StoreError;
use crate::slot::{ScalarSlot, TextSlot};

/// A dynamically-typed column value, as produced by a backing store.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
}

/// One fetched row — column name to value.
pub type Row = Vec<(String, Value)>;

/// A writable destination registered for a result column.
#[derive(Debug, Clone)]
pub enum BindTarget {
    Text(TextSlot),
    Int(ScalarSlot<i32>),
    Long(ScalarSlot<i64>),
    Float(ScalarSlot<f32>),
    Double(ScalarSlot<f64>),
    Bool(ScalarSlot<bool>),
}

/// Connection provides the backing-store capability consumed by generated
/// code: issue a stored-procedure invocation, register column bindings, and
/// step through the result rows.
///
/// After `bind_column`, every successful `next_row` overwrites the bound
/// destinations with that row's column values.
pub trait Connection {
    /// Issue a stored-procedure invocation, e.g. `exec sp_read_rate`.
    fn execute(&mut self, invocation: &str) -> Result<(), StoreError>;

    /// Register a writable destination for a result column.
    fn bind_column(&mut self, column: &str, target: BindTarget) -> Result<(), StoreError>;

    /// Fetch the next row into the bound destinations.
    /// Returns `Ok(false)` once no more rows remain.
    fn next_row(&mut self) -> Result<bool, StoreError>;
}
