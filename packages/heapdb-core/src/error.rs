//! Database error types.

use thiserror::Error;

use crate::transaction::TransactionId;

/// Database operation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DbError {
    /// Field index outside `[0, num_fields)`
    #[error("Field index {index} out of range (schema has {num_fields} fields)")]
    FieldIndexOutOfRange { index: usize, num_fields: usize },

    /// No field carries the requested name
    #[error("No field named '{name}'")]
    FieldNameNotFound { name: String },

    /// Schema construction rejected
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Configuration value rejected
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Type mismatch error
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    /// Page lies (partly) beyond the end of the backing file
    #[error("Page {page_number} out of bounds: offset {offset} + page size exceeds file length {file_len}")]
    PageOutOfBounds {
        page_number: usize,
        offset: u64,
        file_len: u64,
    },

    /// Page id addressed to a different heap file
    #[error("Page of table {requested} requested from heap file {file}")]
    PageTableMismatch { requested: u32, file: u32 },

    /// Table id not registered in the catalog
    #[error("Table {table_id} not found")]
    TableNotFound { table_id: u32 },

    /// Table name not registered in the catalog
    #[error("Table '{name}' not found")]
    TableNameNotFound { name: String },

    /// Iterator exhausted or not open
    #[error("No more elements")]
    NoSuchElement,

    /// Transaction aborted by the page cache
    #[error("Transaction {0} aborted")]
    TransactionAborted(TransactionId),

    /// Operation without an implementation on this storage path
    #[error("Unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Buffer pool cannot take another page
    #[error("Buffer pool full ({capacity} pages)")]
    BufferPoolFull { capacity: usize },

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Data corruption detected
    #[error("Data corruption detected: {0}")]
    DataCorruption(String),

    /// Lock poisoned (RwLock or Mutex poisoned)
    #[error("Lock poisoned")]
    LockPoisoned,

    /// I/O error reading the backing file
    #[error("I/O error: {0}")]
    IoError(String),
}
