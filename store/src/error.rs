use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("no procedure bound for invocation `{0}`")]
    UnknownProcedure(String),

    #[error("execute failed: {0}")]
    Execute(String),

    #[error("fetch failed: {0}")]
    Fetch(String),

    #[error("value for column `{column}` exceeds capacity {capacity}")]
    Capacity { column: String, capacity: usize },

    #[error("type mismatch for column `{0}`")]
    TypeMismatch(String),
}
