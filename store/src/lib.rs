pub mod error;
pub mod memory;
pub mod slot;
pub mod traits;

pub use error::StoreError;
pub use memory::MemoryConnection;
pub use slot::{ScalarSlot, TextSlot};
pub use traits::{BindTarget, Connection, Row, Value};
