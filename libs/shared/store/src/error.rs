use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Conflicting record: {0}")]
    Conflict(String),

    #[error("Transaction serialization failure: {0}")]
    Serialization(String),

    #[error("Store error: {0}")]
    Internal(String),
}
