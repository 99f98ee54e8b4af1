//! Heap file: a table stored as a flat sequence of fixed-size pages.
//!
//! Page `k` occupies bytes `[k * page_size, (k + 1) * page_size)` of the
//! backing file. The file handle is opened per read, so file growth is
//! always visible to `num_pages` and `read_page`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PAGE_SIZE;
use crate::error::DbError;
use crate::io_utils::classify_io_error;
use crate::storage::{HeapPage, HeapPageId, PageCache, TableId};
use crate::transaction::TransactionId;
use crate::tuple::{Schema, Tuple};

use super::iterator::HeapFileIterator;

/// A table's physical storage.
#[derive(Debug)]
pub struct HeapFile {
    path: PathBuf,
    id: TableId,
    schema: Arc<Schema>,
    page_size: usize,
}

impl HeapFile {
    /// Creates a heap file over `path` with the default page size.
    ///
    /// The file itself is not opened until a page is read.
    pub fn open(path: impl Into<PathBuf>, schema: Arc<Schema>) -> Result<Self, DbError> {
        Self::with_page_size(path, schema, PAGE_SIZE)
    }

    /// Creates a heap file over `path` with pages of `page_size` bytes.
    pub fn with_page_size(
        path: impl Into<PathBuf>,
        schema: Arc<Schema>,
        page_size: usize,
    ) -> Result<Self, DbError> {
        if page_size == 0 {
            return Err(DbError::InvalidConfig("page size must be positive".to_string()));
        }
        let path = path.into();
        let path = std::path::absolute(&path)
            .map_err(|e| classify_io_error(e, &format!("resolve {}", path.display())))?;
        let id = TableId::for_path(&path)
            .map_err(|e| classify_io_error(e, &format!("resolve {}", path.display())))?;
        Ok(Self {
            path,
            id,
            schema,
            page_size,
        })
    }

    /// Returns the absolute path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the id of this heap file (and of the table it stores).
    pub fn id(&self) -> TableId {
        self.id
    }

    /// Returns the schema of the stored tuples.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Returns the page size in bytes.
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns `ceil(file_len / page_size)` for the current file length.
    pub fn num_pages(&self) -> Result<usize, DbError> {
        let len = self.file_len()?;
        Ok(len.div_ceil(self.page_size as u64) as usize)
    }

    /// Reads page `page_id` straight from disk.
    ///
    /// Bypasses any cache; readers that need coherence go through a
    /// [`PageCache`].
    ///
    /// # Errors
    /// - `PageTableMismatch` if `page_id` belongs to another table
    /// - `PageOutOfBounds` if the page does not lie fully within the file
    /// - `IoError` if the file cannot be opened or read
    pub fn read_page(&self, page_id: HeapPageId) -> Result<HeapPage, DbError> {
        if page_id.table_id() != self.id {
            return Err(DbError::PageTableMismatch {
                requested: page_id.table_id().0,
                file: self.id.0,
            });
        }

        let context = || format!("read page {} of {}", page_id, self.path.display());
        let mut file = File::open(&self.path).map_err(|e| classify_io_error(e, &context()))?;
        let file_len = file
            .metadata()
            .map_err(|e| classify_io_error(e, &context()))?
            .len();

        let out_of_bounds = |offset| DbError::PageOutOfBounds {
            page_number: page_id.page_number(),
            offset,
            file_len,
        };
        let Some(offset) = page_id.byte_offset(self.page_size) else {
            return Err(out_of_bounds(u64::MAX));
        };
        match offset.checked_add(self.page_size as u64) {
            Some(end) if end <= file_len => {}
            _ => return Err(out_of_bounds(offset)),
        }

        let mut data = vec![0u8; self.page_size];
        file.seek(SeekFrom::Start(offset))
            .map_err(|e| classify_io_error(e, &context()))?;
        file.read_exact(&mut data)
            .map_err(|e| classify_io_error(e, &context()))?;

        tracing::debug!("Read page {} from {}", page_id, self.path.display());
        HeapPage::new(page_id, data, Arc::clone(&self.schema))
    }

    /// Persists `page` at its offset.
    ///
    /// Contract: a later `read_page` of the same id returns byte-identical
    /// content. No write path exists yet, so this always fails.
    pub fn write_page(&self, _page: &HeapPage) -> Result<(), DbError> {
        Err(DbError::Unsupported("HeapFile::write_page"))
    }

    /// Adds `tuple` to the file on behalf of `tid`.
    ///
    /// Contract: returns the pages dirtied by the insert so the page cache can
    /// write them back. No write path exists yet, so this always fails.
    pub fn insert_tuple(
        &self,
        _tid: TransactionId,
        _tuple: &Tuple,
    ) -> Result<Vec<Arc<HeapPage>>, DbError> {
        Err(DbError::Unsupported("HeapFile::insert_tuple"))
    }

    /// Removes `tuple` (located by its record id) on behalf of `tid`.
    ///
    /// Contract: returns the pages dirtied by the delete. No write path
    /// exists yet, so this always fails.
    pub fn delete_tuple(
        &self,
        _tid: TransactionId,
        _tuple: &Tuple,
    ) -> Result<Vec<Arc<HeapPage>>, DbError> {
        Err(DbError::Unsupported("HeapFile::delete_tuple"))
    }

    /// Returns a lazy iterator over every tuple of this file.
    ///
    /// No page is touched until the iterator is opened.
    pub fn iterator(
        self: &Arc<Self>,
        tid: TransactionId,
        cache: Arc<dyn PageCache>,
    ) -> HeapFileIterator {
        HeapFileIterator::new(Arc::clone(self), tid, cache)
    }

    fn file_len(&self) -> Result<u64, DbError> {
        std::fs::metadata(&self.path)
            .map(|m| m.len())
            .map_err(|e| classify_io_error(e, &format!("stat {}", self.path.display())))
    }
}
