//! Tuple: fixed-arity row of values conforming to a schema.

use std::fmt;
use std::sync::Arc;

use crate::error::DbError;
use crate::storage::RecordId;
use crate::types::Value;

use super::schema::Schema;

/// A row of field values.
///
/// Holds exactly `schema.num_fields()` slots, each initially unset. The
/// record id is absent until the tuple is read from (or written to) a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    schema: Arc<Schema>,
    fields: Vec<Option<Value>>,
    record_id: Option<RecordId>,
}

impl Tuple {
    /// Creates a tuple of `schema` with every field unset.
    pub fn new(schema: Arc<Schema>) -> Self {
        let fields = vec![None; schema.num_fields()];
        Self {
            schema,
            fields,
            record_id: None,
        }
    }

    /// Creates a tuple of `schema` populated with `values` in field order.
    pub fn with_values(schema: Arc<Schema>, values: Vec<Value>) -> Result<Self, DbError> {
        if values.len() != schema.num_fields() {
            return Err(DbError::InvalidSchema(format!(
                "{} values for a schema of {} fields",
                values.len(),
                schema.num_fields()
            )));
        }
        let mut tuple = Self::new(schema);
        for (i, value) in values.into_iter().enumerate() {
            tuple.set_field(i, value)?;
        }
        Ok(tuple)
    }

    /// Returns the schema of this tuple.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the on-disk location of this tuple, if known.
    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    /// Sets (or clears) the on-disk location of this tuple.
    pub fn set_record_id(&mut self, record_id: Option<RecordId>) {
        self.record_id = record_id;
    }

    /// Sets field `i`.
    ///
    /// # Errors
    /// - `FieldIndexOutOfRange` if `i` is not a valid field index
    /// - `TypeMismatch` if the value's type differs from the schema's type for `i`
    pub fn set_field(&mut self, i: usize, value: Value) -> Result<(), DbError> {
        let expected = self.schema.field_type(i)?;
        if value.ty() != expected {
            return Err(DbError::TypeMismatch {
                expected: expected.to_string(),
                got: value.ty().to_string(),
            });
        }
        self.fields[i] = Some(value);
        Ok(())
    }

    /// Returns field `i`, or `None` if it has not been set.
    pub fn field(&self, i: usize) -> Result<Option<&Value>, DbError> {
        self.fields
            .get(i)
            .map(Option::as_ref)
            .ok_or(DbError::FieldIndexOutOfRange {
                index: i,
                num_fields: self.fields.len(),
            })
    }

    /// Returns all field slots in order.
    pub fn fields(&self) -> impl Iterator<Item = Option<&Value>> {
        self.fields.iter().map(Option::as_ref)
    }

    /// Replaces the schema and discards every field value.
    ///
    /// This re-initializes the tuple; it is not a projection.
    pub fn reset_schema(&mut self, schema: Arc<Schema>) {
        self.fields = vec![None; schema.num_fields()];
        self.schema = schema;
    }

    /// Appends the fixed-width encoding of this tuple to `out`.
    ///
    /// # Errors
    /// `SerializationError` if a field is unset.
    pub fn serialize(&self, out: &mut Vec<u8>) -> Result<(), DbError> {
        for (i, field) in self.fields.iter().enumerate() {
            let value = field.as_ref().ok_or_else(|| {
                DbError::SerializationError(format!("field {} is not set", i))
            })?;
            value.serialize(out);
        }
        Ok(())
    }
}

/// Tab-separated values terminated by a newline; unset fields print as `null`.
impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                write!(f, "\t")?;
            }
            match field {
                Some(value) => write!(f, "{}", value)?,
                None => write!(f, "null")?,
            }
        }
        writeln!(f)
    }
}
