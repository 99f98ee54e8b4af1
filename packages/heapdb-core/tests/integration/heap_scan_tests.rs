//! Heap file page access and cross-page scans.

use std::fs::OpenOptions;
use std::sync::Arc;

use ntest::timeout;
use tempfile::tempdir;

use heapdb_core::catalog::Catalog;
use heapdb_core::error::DbError;
use heapdb_core::execution::DbFileIterator;
use heapdb_core::storage::{HeapPageId, RecordId};
use heapdb_core::types::Value;

use super::helpers::{people_db, PAGE_SIZE};

#[timeout(5000)]
#[test]
fn test_page_count_and_bounds() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let id = db.catalog().table_id("people").unwrap();
    let file = db.catalog().heap_file(id).unwrap();

    assert_eq!(file.num_pages().unwrap(), 2);
    let last = file.read_page(HeapPageId::new(id, 1)).unwrap();
    assert_eq!(last.num_tuples(), 1);
    assert_eq!(last.num_empty_slots(), 2);

    assert_eq!(
        file.read_page(HeapPageId::new(id, 2)).unwrap_err(),
        DbError::PageOutOfBounds {
            page_number: 2,
            offset: 2 * PAGE_SIZE as u64,
            file_len: 2 * PAGE_SIZE as u64,
        }
    );
}

#[timeout(5000)]
#[test]
fn test_partial_trailing_page_is_counted_but_unreadable() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let id = db.catalog().table_id("people").unwrap();
    let file = db.catalog().heap_file(id).unwrap();

    let handle = OpenOptions::new().write(true).open(file.path()).unwrap();
    handle.set_len(2 * PAGE_SIZE as u64 + 10).unwrap();

    assert_eq!(file.num_pages().unwrap(), 3);
    assert!(matches!(
        file.read_page(HeapPageId::new(id, 2)),
        Err(DbError::PageOutOfBounds { page_number: 2, .. })
    ));
}

#[timeout(5000)]
#[test]
fn test_scan_crosses_pages_in_order() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let id = db.catalog().table_id("people").unwrap();
    let file = db.catalog().heap_file(id).unwrap();

    let mut iter = file.iterator(db.begin_transaction(), db.page_cache());
    assert!(!iter.has_next().unwrap());
    iter.open().unwrap();

    let tuples = iter.collect_remaining().unwrap();
    let ids: Vec<i32> = tuples
        .iter()
        .map(|t| match t.field(0).unwrap() {
            Some(Value::Int(v)) => *v,
            other => panic!("unexpected field {:?}", other),
        })
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let locations: Vec<RecordId> = tuples.iter().map(|t| t.record_id().unwrap()).collect();
    assert_eq!(
        locations,
        vec![
            RecordId::new(HeapPageId::new(id, 0), 0),
            RecordId::new(HeapPageId::new(id, 0), 1),
            RecordId::new(HeapPageId::new(id, 0), 2),
            RecordId::new(HeapPageId::new(id, 1), 0),
        ]
    );

    assert!(!iter.has_next().unwrap());
    assert_eq!(iter.next().unwrap_err(), DbError::NoSuchElement);
}

#[timeout(5000)]
#[test]
fn test_rewind_repeats_sequence() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let id = db.catalog().table_id("people").unwrap();
    let file = db.catalog().heap_file(id).unwrap();

    let mut iter = file.iterator(db.begin_transaction(), db.page_cache());
    iter.open().unwrap();
    let first: Vec<String> = iter
        .collect_remaining()
        .unwrap()
        .iter()
        .map(|t| t.to_string())
        .collect();

    iter.rewind().unwrap();
    let second: Vec<String> = iter
        .collect_remaining()
        .unwrap()
        .iter()
        .map(|t| t.to_string())
        .collect();

    assert_eq!(first, second);
    assert_eq!(first[0], "1\tada\n");
    assert_eq!(first[3], "4\tbarbara\n");
}

#[timeout(5000)]
#[test]
fn test_closed_iterator_yields_nothing() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let id = db.catalog().table_id("people").unwrap();
    let file = db.catalog().heap_file(id).unwrap();

    let mut iter = file.iterator(db.begin_transaction(), db.page_cache());
    iter.open().unwrap();
    iter.next().unwrap();
    iter.close();

    assert!(!iter.has_next().unwrap());
    assert_eq!(iter.next().unwrap_err(), DbError::NoSuchElement);
}

#[timeout(5000)]
#[test]
fn test_mutations_unsupported() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let id = db.catalog().table_id("people").unwrap();
    let file = db.catalog().heap_file(id).unwrap();
    let page = file.read_page(HeapPageId::new(id, 0)).unwrap();
    let tuple = Arc::new(page).iterator().next().unwrap();
    let tid = db.begin_transaction();

    assert!(matches!(
        file.insert_tuple(tid, &tuple),
        Err(DbError::Unsupported(_))
    ));
    assert!(matches!(
        file.delete_tuple(tid, &tuple),
        Err(DbError::Unsupported(_))
    ));
}
