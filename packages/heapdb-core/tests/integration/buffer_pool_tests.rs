//! Buffer pool behaviour.

use std::sync::Arc;
use std::thread;

use ntest::timeout;
use tempfile::tempdir;

use heapdb_core::catalog::Catalog;
use heapdb_core::config::DbConfig;
use heapdb_core::error::DbError;
use heapdb_core::execution::DbFileIterator;
use heapdb_core::storage::{HeapPageId, PageCache, Permissions};
use heapdb_core::Database;

use super::helpers::{config, four_people, people_db, people_schema, write_people};

#[timeout(5000)]
#[test]
fn test_pages_are_cached_and_shared() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let id = db.catalog().table_id("people").unwrap();
    let pool = db.buffer_pool();
    let tid = db.begin_transaction();
    let page_id = HeapPageId::new(id, 0);

    assert!(!pool.is_cached(page_id).unwrap());
    let first = pool.get_page(tid, page_id, Permissions::ReadOnly).unwrap();
    let second = pool.get_page(tid, page_id, Permissions::ReadWrite).unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(pool.is_cached(page_id).unwrap());
    assert_eq!(pool.cached_page_count().unwrap(), 1);

    assert!(pool.discard_page(page_id).unwrap());
    assert!(!pool.discard_page(page_id).unwrap());
    let reloaded = pool.get_page(tid, page_id, Permissions::ReadOnly).unwrap();
    assert!(!Arc::ptr_eq(&first, &reloaded));
    assert_eq!(reloaded.page_data(), first.page_data());
}

#[timeout(5000)]
#[test]
fn test_full_pool_rejects_new_pages() {
    let dir = tempdir().unwrap();
    write_people(dir.path(), "people.dat", four_people());
    let db = Database::new(DbConfig {
        buffer_pool_pages: 1,
        ..config(dir.path())
    })
    .unwrap();
    db.add_table("people", "people.dat", people_schema(), None)
        .unwrap();

    let mut scan = db.seq_scan(db.begin_transaction(), "people", None).unwrap();
    scan.open().unwrap();
    for _ in 0..3 {
        scan.next().unwrap();
    }
    assert_eq!(
        scan.next().unwrap_err(),
        DbError::BufferPoolFull { capacity: 1 }
    );

    let id = db.catalog().table_id("people").unwrap();
    db.buffer_pool().discard_page(HeapPageId::new(id, 0)).unwrap();
    assert_eq!(scan.next().unwrap().to_string(), "4\tbarbara\n");
}

#[timeout(5000)]
#[test]
fn test_unknown_table_and_out_of_bounds() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let id = db.catalog().table_id("people").unwrap();
    let tid = db.begin_transaction();
    let pool = db.page_cache();

    assert!(matches!(
        pool.get_page(tid, HeapPageId::new(id, 9), Permissions::ReadOnly),
        Err(DbError::PageOutOfBounds { page_number: 9, .. })
    ));
    assert_eq!(db.buffer_pool().cached_page_count().unwrap(), 0);

    let other = heapdb_core::storage::TableId(id.0.wrapping_add(1));
    assert_eq!(
        pool.get_page(tid, HeapPageId::new(other, 0), Permissions::ReadOnly)
            .unwrap_err(),
        DbError::TableNotFound { table_id: other.0 }
    );
}

#[timeout(5000)]
#[test]
fn test_concurrent_scans_share_pool() {
    let dir = tempdir().unwrap();
    let db = Arc::new(people_db(dir.path()));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let db = Arc::clone(&db);
            thread::spawn(move || {
                let mut scan = db.seq_scan(db.begin_transaction(), "people", None).unwrap();
                scan.open().unwrap();
                scan.collect_remaining().unwrap().len()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 4);
    }
    assert_eq!(db.buffer_pool().cached_page_count().unwrap(), 2);
    let id = db.catalog().table_id("people").unwrap();
    assert_eq!(db.catalog().heap_file(id).unwrap().num_pages().unwrap(), 2);
}
