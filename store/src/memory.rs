use std::collections::{HashMap, VecDeque};

use tracing::debug;

use crate::error::StoreError;
use crate::traits::{BindTarget, Connection, Row, Value};

/// In-memory Connection backend for tests and demos.
///
/// Result rows are queued per invocation text: `execute` selects the queue,
/// `bind_column` records destinations, and `next_row` writes the next row's
/// column values into them.
#[derive(Default)]
pub struct MemoryConnection {
    procedures: HashMap<String, Vec<Row>>,
    bound: Vec<(String, BindTarget)>,
    pending: VecDeque<Row>,
}

impl MemoryConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue result rows for an invocation, replacing any previous queue.
    pub fn provide(&mut self, invocation: &str, rows: Vec<Row>) {
        self.procedures.insert(invocation.to_string(), rows);
    }
}

impl Connection for MemoryConnection {
    fn execute(&mut self, invocation: &str) -> Result<(), StoreError> {
        let rows = self
            .procedures
            .get(invocation)
            .ok_or_else(|| StoreError::UnknownProcedure(invocation.to_string()))?;
        debug!("MemoryConnection: `{}` yields {} row(s)", invocation, rows.len());
        self.pending = rows.clone().into();
        self.bound.clear();
        Ok(())
    }

    fn bind_column(&mut self, column: &str, target: BindTarget) -> Result<(), StoreError> {
        self.bound.push((column.to_string(), target));
        Ok(())
    }

    fn next_row(&mut self) -> Result<bool, StoreError> {
        let Some(row) = self.pending.pop_front() else {
            return Ok(false);
        };
        for (column, target) in &self.bound {
            // Columns absent from a row leave their destination untouched.
            let Some((_, value)) = row.iter().find(|(name, _)| name == column) else {
                continue;
            };
            match (target, value) {
                (BindTarget::Text(slot), Value::Text(v)) => slot.write(column, v)?,
                (BindTarget::Int(slot), Value::Int(v)) => slot.set(*v),
                (BindTarget::Long(slot), Value::Long(v)) => slot.set(*v),
                (BindTarget::Float(slot), Value::Float(v)) => slot.set(*v),
                (BindTarget::Double(slot), Value::Double(v)) => slot.set(*v),
                (BindTarget::Bool(slot), Value::Bool(v)) => slot.set(*v),
                _ => return Err(StoreError::TypeMismatch(column.clone())),
            }
        }
        Ok(true)
    }
}
