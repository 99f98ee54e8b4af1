//! Database configuration.

use std::path::PathBuf;

/// Size in bytes of every page of a heap file.
pub const PAGE_SIZE: usize = 4096;

/// Default number of pages the buffer pool holds.
pub const DEFAULT_BUFFER_POOL_PAGES: usize = 50;

/// Database configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// Page size in bytes used for heap files opened through the catalog
    pub page_size: usize,
    /// Maximum number of pages cached by the buffer pool
    pub buffer_pool_pages: usize,
    /// Directory holding the catalog file and, by default, the heap files
    pub data_dir: PathBuf,
    /// Catalog file name within `data_dir`
    pub catalog_file: String,
}

impl DbConfig {
    /// Returns the full path of the catalog file.
    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir.join(&self.catalog_file)
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            buffer_pool_pages: DEFAULT_BUFFER_POOL_PAGES,
            data_dir: PathBuf::from("./data"),
            catalog_file: "catalog.json".to_string(),
        }
    }
}
