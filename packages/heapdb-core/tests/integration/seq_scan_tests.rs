//! Sequential scan operator.

use std::sync::Arc;

use ntest::timeout;
use tempfile::tempdir;

use heapdb_core::catalog::{Catalog, MemoryCatalog};
use heapdb_core::error::DbError;
use heapdb_core::execution::{DbFileIterator, DbIterator, SeqScan};
use heapdb_core::heap::HeapFile;
use heapdb_core::storage::{BufferPool, PageCache};
use heapdb_core::transaction::TransactionId;
use heapdb_core::types::{Type, Value};

use super::helpers::{people_db, people_schema, person, write_people, PAGE_SIZE};

fn names(scan: &SeqScan) -> Vec<String> {
    scan.schema()
        .unwrap()
        .items()
        .map(|item| item.field_name.clone().unwrap())
        .collect()
}

#[timeout(5000)]
#[test]
fn test_two_page_scan_through_operator() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let mut scan = db.seq_scan(db.begin_transaction(), "people", None).unwrap();

    assert!(!scan.has_next().unwrap());
    scan.open().unwrap();

    let mut count = 0;
    while scan.has_next().unwrap() {
        let tuple = scan.next().unwrap();
        count += 1;
        assert_eq!(tuple.field(0).unwrap(), Some(&Value::Int(count)));
    }
    assert_eq!(count, 4);
    assert_eq!(scan.next().unwrap_err(), DbError::NoSuchElement);

    scan.rewind().unwrap();
    assert_eq!(scan.collect_remaining().unwrap().len(), 4);
    scan.close();
    assert!(!scan.has_next().unwrap());
}

#[timeout(5000)]
#[test]
fn test_schema_is_alias_qualified() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let tid = db.begin_transaction();

    let by_name = db.seq_scan(tid, "people", None).unwrap();
    assert_eq!(names(&by_name), vec!["people.id", "people.name"]);

    let aliased = db.seq_scan(tid, "people", Some("p")).unwrap();
    assert_eq!(aliased.alias(), Some("p"));
    assert_eq!(aliased.table_name().unwrap(), "people");
    assert_eq!(names(&aliased), vec!["p.id", "p.name"]);

    let schema = aliased.schema().unwrap();
    assert_eq!(schema.field_type(1).unwrap(), Type::String);
    assert_eq!(schema.field_name_to_index("p.name").unwrap(), 1);
    assert!(schema.field_name_to_index("name").is_err());
    assert_eq!(schema, *people_schema());
}

#[timeout(5000)]
#[test]
fn test_missing_alias_and_names_render_null() {
    let dir = tempdir().unwrap();
    write_people(dir.path(), "anon.dat", vec![person(7, "x")]);
    let catalog = Arc::new(MemoryCatalog::new());
    let schema = Arc::new(
        heapdb_core::tuple::Schema::from_types(vec![Type::Int, Type::String]).unwrap(),
    );
    let file = HeapFile::with_page_size(dir.path().join("anon.dat"), schema, PAGE_SIZE).unwrap();
    let id = catalog.add_table(Arc::new(file), "anon", None).unwrap();
    let cache: Arc<dyn PageCache> = Arc::new(BufferPool::new(catalog.clone(), 4));

    let scan = SeqScan::new(TransactionId::new(), id, None, catalog.clone(), cache.clone());
    assert_eq!(names(&scan), vec!["null.null", "null.null"]);

    let named = SeqScan::with_table_alias(TransactionId::new(), id, catalog, cache).unwrap();
    assert_eq!(names(&named), vec!["anon.null", "anon.null"]);
}

#[timeout(5000)]
#[test]
fn test_reset_rebinds_table() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    write_people(dir.path(), "other.dat", vec![person(10, "ten"), person(11, "eleven")]);
    let other = db
        .add_table("other", "other.dat", people_schema(), None)
        .unwrap();

    let mut scan = db.seq_scan(db.begin_transaction(), "people", None).unwrap();
    scan.open().unwrap();
    assert_eq!(scan.collect_remaining().unwrap().len(), 4);

    scan.reset(other, Some("o".to_string()));
    assert_eq!(scan.table_id(), other);
    assert_eq!(names(&scan), vec!["o.id", "o.name"]);

    scan.open().unwrap();
    let tuples = scan.collect_remaining().unwrap();
    assert_eq!(tuples.len(), 2);
    assert_eq!(tuples[0].to_string(), "10\tten\n");
}

#[timeout(5000)]
#[test]
fn test_rewind_before_open_opens() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let mut scan = db.seq_scan(db.begin_transaction(), "people", None).unwrap();

    scan.rewind().unwrap();
    assert!(scan.has_next().unwrap());
    assert_eq!(scan.next().unwrap().to_string(), "1\tada\n");
}

#[timeout(5000)]
#[test]
fn test_unknown_table_fails_on_open() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    let catalog: Arc<dyn Catalog> = db.catalog().clone();
    let mut scan = SeqScan::new(
        db.begin_transaction(),
        heapdb_core::storage::TableId(1),
        Some("ghost".to_string()),
        catalog,
        db.page_cache(),
    );

    assert_eq!(
        scan.open().unwrap_err(),
        DbError::TableNotFound { table_id: 1 }
    );
    assert!(scan.schema().is_err());
}
