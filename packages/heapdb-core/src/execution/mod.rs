//! Iteration protocol and scan operators.

mod seq_scan;
mod traits;

pub use seq_scan::SeqScan;
pub use traits::{DbFileIterator, DbIterator};
