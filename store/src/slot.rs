use std::sync::{Arc, Mutex};

use crate::error::StoreError;

/// Shared scalar binding destination. Cloning yields a handle to the same
/// cell, so a connection can overwrite the value a scratch row reads back.
#[derive(Debug, Clone)]
pub struct ScalarSlot<T: Copy> {
    cell: Arc<Mutex<T>>,
}

impl<T: Copy> ScalarSlot<T> {
    pub fn new(value: T) -> Self {
        Self {
            cell: Arc::new(Mutex::new(value)),
        }
    }

    pub fn get(&self) -> T {
        *self.cell.lock().unwrap()
    }

    pub fn set(&self, value: T) {
        *self.cell.lock().unwrap() = value;
    }
}

/// Shared text binding destination with a capacity upper bound.
///
/// The capacity is validated when the store writes into the slot — it
/// replaces the fixed-size buffer a row fetch would otherwise overwrite in
/// place. A capacity of zero means unbounded.
#[derive(Debug, Clone)]
pub struct TextSlot {
    buf: Arc<Mutex<String>>,
    capacity: usize,
}

impl TextSlot {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Arc::new(Mutex::new(String::new())),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn get(&self) -> String {
        self.buf.lock().unwrap().clone()
    }

    /// Overwrite the slot contents. `column` names the offender if `value`
    /// exceeds the declared capacity.
    pub fn write(&self, column: &str, value: &str) -> Result<(), StoreError> {
        if self.capacity > 0 && value.len() > self.capacity {
            return Err(StoreError::Capacity {
                column: column.to_string(),
                capacity: self.capacity,
            });
        }
        let mut buf = self.buf.lock().unwrap();
        buf.clear();
        buf.push_str(value);
        Ok(())
    }
}
