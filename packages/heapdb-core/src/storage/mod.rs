//! Page identifiers, record locators, heap pages and the page cache.

mod heap_page;
mod page_cache;
mod page_id;
mod record_id;

pub use heap_page::{header_size, slots_per_page, HeapPage, PageTupleIter};
pub use page_cache::{BufferPool, PageCache};
pub use page_id::{HeapPageId, Permissions, TableId};
pub use record_id::RecordId;
