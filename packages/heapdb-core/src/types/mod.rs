//! Scalar field types and their fixed-width binary encoding.

mod value;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DbError;

pub use value::Value;

/// Maximum number of string bytes stored in a `Type::String` field.
pub const STRING_LEN: usize = 128;

/// Scalar field types supported by heap files.
///
/// Every type has a fixed serialized width, so a tuple of a given schema
/// always occupies the same number of bytes on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Type {
    /// 32-bit signed integer (4 bytes, big-endian)
    Int,
    /// UTF-8 string (4-byte big-endian length + `STRING_LEN` padded bytes)
    String,
}

impl Type {
    /// Returns the number of bytes a value of this type occupies on disk.
    pub fn len(&self) -> usize {
        match self {
            Type::Int => 4,
            Type::String => STRING_LEN + 4,
        }
    }

    /// Decodes a value of this type from the start of `bytes`.
    pub fn parse(&self, bytes: &[u8]) -> Result<Value, DbError> {
        if bytes.len() < self.len() {
            return Err(DbError::SerializationError(format!(
                "{} needs {} bytes, got {}",
                self,
                self.len(),
                bytes.len()
            )));
        }

        match self {
            Type::Int => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&bytes[..4]);
                Ok(Value::Int(i32::from_be_bytes(raw)))
            }
            Type::String => {
                let mut raw = [0u8; 4];
                raw.copy_from_slice(&bytes[..4]);
                let len = u32::from_be_bytes(raw) as usize;
                if len > STRING_LEN {
                    return Err(DbError::SerializationError(format!(
                        "string length {} exceeds {}",
                        len, STRING_LEN
                    )));
                }
                let text = std::str::from_utf8(&bytes[4..4 + len])
                    .map_err(|e| DbError::SerializationError(e.to_string()))?;
                Ok(Value::String(text.to_string()))
            }
        }
    }

    /// Parses the text form of a value of this type.
    pub fn parse_text(&self, text: &str) -> Result<Value, DbError> {
        match self {
            Type::Int => text
                .trim()
                .parse::<i32>()
                .map(Value::Int)
                .map_err(|e| DbError::SerializationError(format!("'{}': {}", text, e))),
            Type::String => Ok(Value::string(text)),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => write!(f, "int"),
            Type::String => write!(f, "string"),
        }
    }
}

impl FromStr for Type {
    type Err = DbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "int" => Ok(Type::Int),
            "string" => Ok(Type::String),
            other => Err(DbError::SerializationError(format!(
                "unknown type '{}'",
                other
            ))),
        }
    }
}
