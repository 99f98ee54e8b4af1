//! Field values.

use std::fmt;

use super::{Type, STRING_LEN};

/// A single field value of a tuple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Value {
    /// 32-bit signed integer
    Int(i32),
    /// UTF-8 string of at most `STRING_LEN` bytes
    String(String),
}

impl Value {
    /// Creates a string value, truncating to `STRING_LEN` bytes on a char boundary.
    pub fn string(text: &str) -> Self {
        let mut end = text.len().min(STRING_LEN);
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        Value::String(text[..end].to_string())
    }

    /// Returns the type of this value.
    pub fn ty(&self) -> Type {
        match self {
            Value::Int(_) => Type::Int,
            Value::String(_) => Type::String,
        }
    }

    /// Appends the fixed-width encoding of this value to `out`.
    ///
    /// Always writes exactly `self.ty().len()` bytes.
    pub fn serialize(&self, out: &mut Vec<u8>) {
        match self {
            Value::Int(v) => out.extend_from_slice(&v.to_be_bytes()),
            Value::String(s) => {
                let mut len = s.len().min(STRING_LEN);
                while !s.is_char_boundary(len) {
                    len -= 1;
                }
                out.extend_from_slice(&(len as u32).to_be_bytes());
                out.extend_from_slice(&s.as_bytes()[..len]);
                out.extend(std::iter::repeat_n(0u8, STRING_LEN - len));
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{}", v),
            Value::String(s) => write!(f, "{}", s),
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
