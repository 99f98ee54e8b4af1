//! Heap-file storage engine.
//!
//! Tables are stored as flat files of fixed-size slotted pages. Pages are
//! read through a [`storage::PageCache`], and tuples are scanned with
//! cursors implementing [`execution::DbFileIterator`].

pub mod catalog;
pub mod config;
pub mod database;
pub mod error;
pub mod execution;
pub mod heap;
pub mod storage;
pub mod transaction;
pub mod tuple;
pub mod types;

mod io_utils;

pub use database::Database;
pub use error::DbError;
