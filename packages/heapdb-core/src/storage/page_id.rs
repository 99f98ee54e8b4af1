//! Table and page identifiers.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Identifies a table and the heap file backing it.
///
/// Derived from the absolute path of the backing file (see
/// [`TableId::for_path`]); distinct files may collide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TableId(pub u32);

impl TableId {
    /// Derives the id of the heap file at `path`.
    ///
    /// The id is the CRC-32 of the absolute path string, so the same file
    /// always maps to the same id. Relative paths are resolved against the
    /// current directory first.
    pub fn for_path(path: &Path) -> std::io::Result<Self> {
        let absolute = std::path::absolute(path)?;
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(absolute.to_string_lossy().as_bytes());
        Ok(Self(hasher.finalize()))
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one page of one heap file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HeapPageId {
    table_id: TableId,
    page_number: usize,
}

impl HeapPageId {
    /// Creates a page id.
    pub const fn new(table_id: TableId, page_number: usize) -> Self {
        Self {
            table_id,
            page_number,
        }
    }

    /// Returns the table this page belongs to.
    pub const fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Returns the zero-based page index within the file.
    pub const fn page_number(&self) -> usize {
        self.page_number
    }

    /// Calculates the byte offset of this page in a file of `page_size` pages.
    ///
    /// Returns `None` if the offset does not fit in a `u64`.
    pub const fn byte_offset(&self, page_size: usize) -> Option<u64> {
        (self.page_number as u64).checked_mul(page_size as u64)
    }
}

impl fmt::Display for HeapPageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.table_id, self.page_number)
    }
}

/// Access level requested from the page cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permissions {
    ReadOnly,
    ReadWrite,
}
