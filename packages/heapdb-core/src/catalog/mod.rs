//! Table catalog: maps table ids to heap files, schemas and names.

mod catalog_file;

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::DbError;
use crate::heap::HeapFile;
use crate::storage::TableId;
use crate::tuple::Schema;

pub use catalog_file::{load_catalog, save_catalog, CatalogFile, FieldEntry, TableEntry};

/// Table metadata lookup.
pub trait Catalog: Send + Sync {
    /// Returns the heap file storing `table_id`.
    fn heap_file(&self, table_id: TableId) -> Result<Arc<HeapFile>, DbError>;

    /// Returns the schema of `table_id`.
    fn schema(&self, table_id: TableId) -> Result<Arc<Schema>, DbError> {
        self.heap_file(table_id).map(|file| Arc::clone(file.schema()))
    }

    /// Returns the name of `table_id`.
    fn table_name(&self, table_id: TableId) -> Result<String, DbError>;
}

#[derive(Debug)]
struct CatalogTable {
    file: Arc<HeapFile>,
    name: String,
    primary_key: Option<String>,
}

#[derive(Debug, Default)]
struct CatalogInner {
    tables: HashMap<TableId, CatalogTable>,
    names: HashMap<String, TableId>,
}

/// In-memory catalog.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    inner: RwLock<CatalogInner>,
}

impl MemoryCatalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `file` as table `name`.
    ///
    /// A table already registered under `name`, or already backed by the same
    /// file, is replaced.
    pub fn add_table(
        &self,
        file: Arc<HeapFile>,
        name: impl Into<String>,
        primary_key: Option<String>,
    ) -> Result<TableId, DbError> {
        let name = name.into();
        let table_id = file.id();
        let mut inner = self.inner.write().map_err(|_| DbError::LockPoisoned)?;

        if let Some(old_id) = inner.names.remove(&name) {
            inner.tables.remove(&old_id);
        }
        if let Some(old) = inner.tables.remove(&table_id) {
            inner.names.remove(&old.name);
        }

        tracing::debug!(
            "Registered table '{}' (id {}) at {}",
            name,
            table_id,
            file.path().display()
        );
        inner.names.insert(name.clone(), table_id);
        inner.tables.insert(
            table_id,
            CatalogTable {
                file,
                name,
                primary_key,
            },
        );
        Ok(table_id)
    }

    /// Returns the id of the table named `name`.
    pub fn table_id(&self, name: &str) -> Result<TableId, DbError> {
        let inner = self.inner.read().map_err(|_| DbError::LockPoisoned)?;
        inner
            .names
            .get(name)
            .copied()
            .ok_or_else(|| DbError::TableNameNotFound {
                name: name.to_string(),
            })
    }

    /// Returns the primary key field of `table_id`, if any.
    pub fn primary_key(&self, table_id: TableId) -> Result<Option<String>, DbError> {
        let inner = self.inner.read().map_err(|_| DbError::LockPoisoned)?;
        inner
            .tables
            .get(&table_id)
            .map(|t| t.primary_key.clone())
            .ok_or(DbError::TableNotFound {
                table_id: table_id.0,
            })
    }

    /// Returns the ids of all registered tables, sorted.
    pub fn table_ids(&self) -> Result<Vec<TableId>, DbError> {
        let inner = self.inner.read().map_err(|_| DbError::LockPoisoned)?;
        let mut ids: Vec<TableId> = inner.tables.keys().copied().collect();
        ids.sort();
        Ok(ids)
    }

    /// Removes every table.
    pub fn clear(&self) -> Result<(), DbError> {
        let mut inner = self.inner.write().map_err(|_| DbError::LockPoisoned)?;
        inner.tables.clear();
        inner.names.clear();
        Ok(())
    }

    fn with_table<T>(
        &self,
        table_id: TableId,
        f: impl FnOnce(&CatalogTable) -> T,
    ) -> Result<T, DbError> {
        let inner = self.inner.read().map_err(|_| DbError::LockPoisoned)?;
        inner.tables.get(&table_id).map(f).ok_or(DbError::TableNotFound {
            table_id: table_id.0,
        })
    }
}

impl Catalog for MemoryCatalog {
    fn heap_file(&self, table_id: TableId) -> Result<Arc<HeapFile>, DbError> {
        self.with_table(table_id, |t| Arc::clone(&t.file))
    }

    fn table_name(&self, table_id: TableId) -> Result<String, DbError> {
        self.with_table(table_id, |t| t.name.clone())
    }
}
