//! Page cache contract and the buffer pool implementation.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::catalog::Catalog;
use crate::error::DbError;
use crate::transaction::TransactionId;

use super::heap_page::HeapPage;
use super::page_id::{HeapPageId, Permissions};

/// Materializes pages on behalf of transactions.
///
/// All page access from iterators goes through this trait. Implementations
/// own any locking and may fail with `DbError::TransactionAborted`.
pub trait PageCache: Send + Sync {
    /// Returns the page `page_id`, reading it from its heap file if needed.
    fn get_page(
        &self,
        tid: TransactionId,
        page_id: HeapPageId,
        perm: Permissions,
    ) -> Result<Arc<HeapPage>, DbError>;
}

/// Bounded page cache backed by the heap files registered in a catalog.
///
/// Pages stay cached until discarded. A miss while the pool already holds
/// `capacity` pages fails with `DbError::BufferPoolFull`; no eviction is
/// attempted.
pub struct BufferPool {
    catalog: Arc<dyn Catalog>,
    capacity: usize,
    pages: Mutex<HashMap<HeapPageId, Arc<HeapPage>>>,
}

impl BufferPool {
    /// Creates a buffer pool holding at most `capacity` pages.
    pub fn new(catalog: Arc<dyn Catalog>, capacity: usize) -> Self {
        Self {
            catalog,
            capacity,
            pages: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the maximum number of cached pages.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns the number of pages currently cached.
    pub fn cached_page_count(&self) -> Result<usize, DbError> {
        let pages = self.pages.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(pages.len())
    }

    /// Returns whether `page_id` is cached.
    pub fn is_cached(&self, page_id: HeapPageId) -> Result<bool, DbError> {
        let pages = self.pages.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(pages.contains_key(&page_id))
    }

    /// Drops `page_id` from the cache. Returns whether it was cached.
    pub fn discard_page(&self, page_id: HeapPageId) -> Result<bool, DbError> {
        let mut pages = self.pages.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(pages.remove(&page_id).is_some())
    }
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl PageCache for BufferPool {
    fn get_page(
        &self,
        tid: TransactionId,
        page_id: HeapPageId,
        perm: Permissions,
    ) -> Result<Arc<HeapPage>, DbError> {
        let mut pages = self.pages.lock().map_err(|_| DbError::LockPoisoned)?;
        if let Some(page) = pages.get(&page_id) {
            tracing::trace!("Buffer pool hit for page {} (tx {}, {:?})", page_id, tid, perm);
            return Ok(Arc::clone(page));
        }

        if pages.len() >= self.capacity {
            tracing::warn!(
                "Buffer pool full ({} pages), cannot load page {}",
                self.capacity,
                page_id
            );
            return Err(DbError::BufferPoolFull {
                capacity: self.capacity,
            });
        }

        let file = self.catalog.heap_file(page_id.table_id())?;
        let page = Arc::new(file.read_page(page_id)?);
        tracing::trace!("Buffer pool loaded page {} (tx {}, {:?})", page_id, tid, perm);
        pages.insert(page_id, Arc::clone(&page));
        Ok(page)
    }
}
