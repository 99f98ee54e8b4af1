//! Integration tests for the heap-file storage engine.
//!
//! 1. Heap file page access and cross-page scans
//! 2. Sequential scan operator
//! 3. Buffer pool behaviour
//! 4. Catalog files and database wiring

pub mod buffer_pool_tests;
pub mod catalog_tests;
pub mod heap_scan_tests;
pub mod helpers;
pub mod seq_scan_tests;
