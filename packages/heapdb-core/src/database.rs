//! Database container wiring the catalog and the buffer pool together.

use std::path::Path;
use std::sync::Arc;

use crate::catalog::{load_catalog, save_catalog, Catalog, MemoryCatalog};
use crate::config::DbConfig;
use crate::error::DbError;
use crate::execution::SeqScan;
use crate::heap::HeapFile;
use crate::storage::{BufferPool, PageCache, TableId};
use crate::transaction::TransactionId;
use crate::tuple::Schema;

/// A catalog plus the buffer pool reading through it.
///
/// Components receive the catalog and page cache explicitly; there is no
/// process-wide database instance.
#[derive(Debug)]
pub struct Database {
    config: DbConfig,
    catalog: Arc<MemoryCatalog>,
    buffer_pool: Arc<BufferPool>,
}

impl Database {
    /// Creates a database with an empty catalog.
    pub fn new(config: DbConfig) -> Result<Self, DbError> {
        Self::with_catalog(config, MemoryCatalog::new())
    }

    /// Creates a database, loading the catalog file from `config.data_dir`
    /// when one exists.
    pub fn open(config: DbConfig) -> Result<Self, DbError> {
        let catalog_path = config.catalog_path();
        if !catalog_path.exists() {
            tracing::debug!(
                "No catalog at {}, starting empty",
                catalog_path.display()
            );
            return Self::new(config);
        }
        let catalog = load_catalog(&catalog_path, config.page_size)?;
        Self::with_catalog(config, catalog)
    }

    fn with_catalog(config: DbConfig, catalog: MemoryCatalog) -> Result<Self, DbError> {
        if config.page_size == 0 {
            return Err(DbError::InvalidConfig("page size must be positive".to_string()));
        }
        if config.buffer_pool_pages == 0 {
            return Err(DbError::InvalidConfig(
                "buffer pool must hold at least one page".to_string(),
            ));
        }
        let catalog = Arc::new(catalog);
        let shared: Arc<dyn Catalog> = catalog.clone();
        let buffer_pool = Arc::new(BufferPool::new(shared, config.buffer_pool_pages));
        Ok(Self {
            config,
            catalog,
            buffer_pool,
        })
    }

    /// Returns the configuration.
    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Returns the catalog.
    pub fn catalog(&self) -> &Arc<MemoryCatalog> {
        &self.catalog
    }

    /// Returns the buffer pool.
    pub fn buffer_pool(&self) -> &Arc<BufferPool> {
        &self.buffer_pool
    }

    /// Returns the buffer pool as a `PageCache` handle.
    pub fn page_cache(&self) -> Arc<dyn PageCache> {
        self.buffer_pool.clone()
    }

    /// Starts a new transaction.
    pub fn begin_transaction(&self) -> TransactionId {
        TransactionId::new()
    }

    /// Registers the heap file `file` as table `name`.
    ///
    /// A relative `file` is resolved against `config.data_dir`.
    pub fn add_table(
        &self,
        name: &str,
        file: impl AsRef<Path>,
        schema: Arc<Schema>,
        primary_key: Option<String>,
    ) -> Result<TableId, DbError> {
        let path = self.config.data_dir.join(file);
        let heap_file = HeapFile::with_page_size(path, schema, self.config.page_size)?;
        self.catalog
            .add_table(Arc::new(heap_file), name, primary_key)
    }

    /// Writes the catalog to `config.data_dir`.
    pub fn save_catalog(&self) -> Result<(), DbError> {
        save_catalog(&self.catalog, &self.config.catalog_path())
    }

    /// Creates a sequential scan over the table named `table_name`.
    ///
    /// Without an alias, field names are qualified with the table name.
    pub fn seq_scan(
        &self,
        tid: TransactionId,
        table_name: &str,
        alias: Option<&str>,
    ) -> Result<SeqScan, DbError> {
        let table_id = self.catalog.table_id(table_name)?;
        let alias = alias.unwrap_or(table_name).to_string();
        Ok(SeqScan::new(
            tid,
            table_id,
            Some(alias),
            self.catalog.clone(),
            self.page_cache(),
        ))
    }
}
