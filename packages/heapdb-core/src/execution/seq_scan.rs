//! Sequential scan operator.

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::error::DbError;
use crate::heap::HeapFileIterator;
use crate::storage::{PageCache, TableId};
use crate::transaction::TransactionId;
use crate::tuple::{Schema, SchemaItem, Tuple};

use super::traits::{DbFileIterator, DbIterator};

/// Yields every tuple of a table in storage order.
///
/// Field names of the output schema are qualified with the table alias
/// (`alias.field`), so tables with overlapping field names can be joined.
pub struct SeqScan {
    tid: TransactionId,
    table_id: TableId,
    alias: Option<String>,
    catalog: Arc<dyn Catalog>,
    cache: Arc<dyn PageCache>,
    iter: Option<HeapFileIterator>,
}

impl SeqScan {
    /// Creates a scan of `table_id` for `tid`, qualifying names with `alias`.
    pub fn new(
        tid: TransactionId,
        table_id: TableId,
        alias: Option<String>,
        catalog: Arc<dyn Catalog>,
        cache: Arc<dyn PageCache>,
    ) -> Self {
        Self {
            tid,
            table_id,
            alias,
            catalog,
            cache,
            iter: None,
        }
    }

    /// Creates a scan whose alias is the table's catalog name.
    pub fn with_table_alias(
        tid: TransactionId,
        table_id: TableId,
        catalog: Arc<dyn Catalog>,
        cache: Arc<dyn PageCache>,
    ) -> Result<Self, DbError> {
        let alias = catalog.table_name(table_id)?;
        Ok(Self::new(tid, table_id, Some(alias), catalog, cache))
    }

    /// Returns the catalog name of the scanned table.
    pub fn table_name(&self) -> Result<String, DbError> {
        self.catalog.table_name(self.table_id)
    }

    /// Returns the alias used to qualify field names.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Returns the scanned table.
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Rebinds the scan to another table and alias.
    ///
    /// The current iterator is left as is; call `open` to scan the new table.
    pub fn reset(&mut self, table_id: TableId, alias: Option<String>) {
        self.table_id = table_id;
        self.alias = alias;
    }
}

impl DbFileIterator for SeqScan {
    fn open(&mut self) -> Result<(), DbError> {
        let file = self.catalog.heap_file(self.table_id)?;
        let mut iter = file.iterator(self.tid, Arc::clone(&self.cache));
        iter.open()?;
        self.iter = Some(iter);
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool, DbError> {
        match self.iter.as_mut() {
            Some(iter) => iter.has_next(),
            None => Ok(false),
        }
    }

    fn next(&mut self) -> Result<Tuple, DbError> {
        if !self.has_next()? {
            return Err(DbError::NoSuchElement);
        }
        match self.iter.as_mut() {
            Some(iter) => iter.next(),
            None => Err(DbError::NoSuchElement),
        }
    }

    fn rewind(&mut self) -> Result<(), DbError> {
        match self.iter.as_mut() {
            Some(iter) => iter.rewind(),
            None => self.open(),
        }
    }

    fn close(&mut self) {
        if let Some(iter) = self.iter.as_mut() {
            iter.close();
        }
    }
}

impl DbIterator for SeqScan {
    fn schema(&self) -> Result<Schema, DbError> {
        let base = self.catalog.schema(self.table_id)?;
        let alias = self.alias.as_deref().unwrap_or("null");
        let items = base
            .items()
            .map(|item| {
                let name = item.field_name.as_deref().unwrap_or("null");
                SchemaItem::new(item.field_type, Some(format!("{}.{}", alias, name)))
            })
            .collect();
        Schema::from_items(items)
    }
}
