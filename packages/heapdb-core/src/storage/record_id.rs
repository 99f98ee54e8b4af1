//! Record locator.

use std::fmt;

use super::page_id::HeapPageId;

/// Physical location of a tuple: page plus slot within the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordId {
    /// Page containing the tuple.
    pub page_id: HeapPageId,
    /// Slot within the page.
    pub slot: usize,
}

impl RecordId {
    /// Creates a new record identifier.
    pub fn new(page_id: HeapPageId, slot: usize) -> Self {
        Self { page_id, slot }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.page_id, self.slot)
    }
}
