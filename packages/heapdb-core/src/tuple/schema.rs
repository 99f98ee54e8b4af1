//! Tuple schema: ordered list of typed, optionally named fields.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::error::DbError;
use crate::types::Type;

/// One field of a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaItem {
    /// Field type
    pub field_type: Type,
    /// Field name, absent for anonymous fields
    pub field_name: Option<String>,
}

impl SchemaItem {
    /// Creates a schema item.
    pub fn new(field_type: Type, field_name: Option<String>) -> Self {
        Self {
            field_type,
            field_name,
        }
    }
}

impl fmt::Display for SchemaItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}({})",
            self.field_type,
            self.field_name.as_deref().unwrap_or("null")
        )
    }
}

/// Describes the shape of a tuple.
///
/// # Invariants
///
/// - At least one field.
/// - The field list never changes after construction.
///
/// Equality only looks at the type sequence: two schemas whose fields have
/// the same types in the same order are equal regardless of field names.
#[derive(Debug, Clone)]
pub struct Schema {
    items: Vec<SchemaItem>,
}

impl Schema {
    /// Creates a schema from parallel type and name lists.
    ///
    /// # Errors
    /// `DbError::InvalidSchema` if `types` is empty or the lists differ in length.
    pub fn new(types: Vec<Type>, names: Vec<Option<String>>) -> Result<Self, DbError> {
        if types.len() != names.len() {
            return Err(DbError::InvalidSchema(format!(
                "{} types but {} names",
                types.len(),
                names.len()
            )));
        }
        Self::from_items(
            types
                .into_iter()
                .zip(names)
                .map(|(ty, name)| SchemaItem::new(ty, name))
                .collect(),
        )
    }

    /// Creates a schema of anonymous fields.
    pub fn from_types(types: Vec<Type>) -> Result<Self, DbError> {
        Self::from_items(types.into_iter().map(|ty| SchemaItem::new(ty, None)).collect())
    }

    /// Creates a schema from `(type, name)` pairs.
    pub fn named(fields: &[(Type, &str)]) -> Result<Self, DbError> {
        Self::from_items(
            fields
                .iter()
                .map(|(ty, name)| SchemaItem::new(*ty, Some(name.to_string())))
                .collect(),
        )
    }

    /// Creates a schema from prepared items.
    pub fn from_items(items: Vec<SchemaItem>) -> Result<Self, DbError> {
        if items.is_empty() {
            return Err(DbError::InvalidSchema(
                "schema needs at least one field".to_string(),
            ));
        }
        Ok(Self { items })
    }

    /// Returns the number of fields.
    pub fn num_fields(&self) -> usize {
        self.items.len()
    }

    /// Returns the fields in declaration order.
    pub fn items(&self) -> impl Iterator<Item = &SchemaItem> {
        self.items.iter()
    }

    /// Returns the (possibly absent) name of field `i`.
    pub fn field_name(&self, i: usize) -> Result<Option<&str>, DbError> {
        self.item(i).map(|item| item.field_name.as_deref())
    }

    /// Returns the type of field `i`.
    pub fn field_type(&self, i: usize) -> Result<Type, DbError> {
        self.item(i).map(|item| item.field_type)
    }

    /// Returns the index of the first field named exactly `name`.
    ///
    /// Anonymous fields never match.
    pub fn field_name_to_index(&self, name: &str) -> Result<usize, DbError> {
        self.items
            .iter()
            .position(|item| item.field_name.as_deref() == Some(name))
            .ok_or_else(|| DbError::FieldNameNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the byte size of tuples of this schema.
    pub fn size(&self) -> usize {
        self.items.iter().map(|item| item.field_type.len()).sum()
    }

    /// Concatenates two schemas: all of `first`'s fields, then all of `second`'s.
    pub fn merge(first: &Schema, second: &Schema) -> Schema {
        let mut items = Vec::with_capacity(first.num_fields() + second.num_fields());
        items.extend(first.items.iter().cloned());
        items.extend(second.items.iter().cloned());
        Schema { items }
    }

    fn item(&self, i: usize) -> Result<&SchemaItem, DbError> {
        self.items.get(i).ok_or(DbError::FieldIndexOutOfRange {
            index: i,
            num_fields: self.items.len(),
        })
    }
}

impl PartialEq for Schema {
    fn eq(&self, other: &Self) -> bool {
        self.num_fields() == other.num_fields()
            && self.size() == other.size()
            && self
                .items
                .iter()
                .zip(&other.items)
                .all(|(a, b)| a.field_type == b.field_type)
    }
}

impl Eq for Schema {}

impl Hash for Schema {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for item in &self.items {
            item.field_type.hash(state);
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", item)?;
        }
        Ok(())
    }
}
