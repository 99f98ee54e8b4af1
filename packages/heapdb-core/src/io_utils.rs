//! I/O error classification.

use std::io::ErrorKind;

use crate::error::DbError;

/// Converts an I/O error into a `DbError`, prefixing `context`.
///
/// Heap file reads are never retried: the caller cannot tell transient from
/// permanent failures, so every kind maps to `DbError::IoError`.
pub(crate) fn classify_io_error(error: std::io::Error, context: &str) -> DbError {
    match error.kind() {
        ErrorKind::NotFound => DbError::IoError(format!("{}: file not found", context)),
        ErrorKind::PermissionDenied => DbError::IoError(format!("{}: permission denied", context)),
        ErrorKind::UnexpectedEof => DbError::IoError(format!("{}: short read", context)),
        _ => DbError::IoError(format!("{}: {}", context, error)),
    }
}
