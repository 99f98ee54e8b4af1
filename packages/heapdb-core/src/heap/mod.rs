//! Heap files: page-addressed table storage, scanning and bulk encoding.

mod encoder;
mod heap_file;
mod iterator;

pub use encoder::HeapFileEncoder;
pub use heap_file::HeapFile;
pub use iterator::HeapFileIterator;
