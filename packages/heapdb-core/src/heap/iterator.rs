//! Cross-page tuple iterator over a heap file.

use std::sync::Arc;

use crate::error::DbError;
use crate::execution::DbFileIterator;
use crate::storage::{HeapPageId, PageCache, PageTupleIter, Permissions};
use crate::transaction::TransactionId;
use crate::tuple::Tuple;

use super::heap_file::HeapFile;

/// Walks the pages of a heap file in ascending order, and the tuples of each
/// page in slot order.
///
/// Pages are fetched through the page cache with `READ_WRITE` permission, one
/// at a time, as the cursor reaches them. Closing the iterator does not
/// release pages; their lifetime belongs to the page cache.
pub struct HeapFileIterator {
    file: Arc<HeapFile>,
    tid: TransactionId,
    cache: Arc<dyn PageCache>,
    page_number: usize,
    page_iter: Option<PageTupleIter>,
    open: bool,
}

impl HeapFileIterator {
    /// Creates a closed iterator over `file` for transaction `tid`.
    pub fn new(file: Arc<HeapFile>, tid: TransactionId, cache: Arc<dyn PageCache>) -> Self {
        Self {
            file,
            tid,
            cache,
            page_number: 0,
            page_iter: None,
            open: false,
        }
    }

    /// Returns the index of the page under the cursor.
    pub fn current_page(&self) -> usize {
        self.page_number
    }

    /// Returns whether the iterator is open.
    pub fn is_open(&self) -> bool {
        self.open
    }

    fn load_page(&self, page_number: usize) -> Result<PageTupleIter, DbError> {
        let page_id = HeapPageId::new(self.file.id(), page_number);
        let page = self
            .cache
            .get_page(self.tid, page_id, Permissions::ReadWrite)?;
        tracing::trace!("Iterator for tx {} moved to page {}", self.tid, page_id);
        Ok(page.iterator())
    }
}

impl DbFileIterator for HeapFileIterator {
    fn open(&mut self) -> Result<(), DbError> {
        if self.open {
            return Ok(());
        }
        self.page_number = 0;
        self.page_iter = if self.file.num_pages()? > 0 {
            Some(self.load_page(0)?)
        } else {
            None
        };
        self.open = true;
        Ok(())
    }

    fn has_next(&mut self) -> Result<bool, DbError> {
        if !self.open {
            return Ok(false);
        }
        let Some(page_iter) = &self.page_iter else {
            return Ok(false);
        };
        if page_iter.has_next() {
            return Ok(true);
        }
        Ok(self.page_number + 1 < self.file.num_pages()?)
    }

    fn next(&mut self) -> Result<Tuple, DbError> {
        if !self.has_next()? {
            return Err(DbError::NoSuchElement);
        }

        loop {
            if let Some(tuple) = self.page_iter.as_mut().and_then(Iterator::next) {
                return Ok(tuple);
            }
            if self.page_number + 1 >= self.file.num_pages()? {
                return Err(DbError::NoSuchElement);
            }
            let next_page = self.page_number + 1;
            let page_iter = self.load_page(next_page)?;
            self.page_number = next_page;
            self.page_iter = Some(page_iter);
        }
    }

    fn rewind(&mut self) -> Result<(), DbError> {
        self.close();
        self.page_number = 0;
        self.open()
    }

    fn close(&mut self) {
        self.page_iter = None;
        self.open = false;
    }
}
