//! Catalog files and database wiring.

use std::fs;

use ntest::timeout;
use tempfile::tempdir;

use heapdb_core::catalog::{load_catalog, Catalog, CatalogFile};
use heapdb_core::execution::{DbFileIterator, DbIterator};
use heapdb_core::heap::HeapFileEncoder;
use heapdb_core::types::Type;
use heapdb_core::Database;

use super::helpers::{config, people_db, people_schema, PAGE_SIZE};

#[timeout(5000)]
#[test]
fn test_database_round_trips_catalog() {
    let dir = tempdir().unwrap();
    let db = people_db(dir.path());
    db.save_catalog().unwrap();

    let raw: CatalogFile =
        serde_json::from_str(&fs::read_to_string(dir.path().join("catalog.json")).unwrap())
            .unwrap();
    assert_eq!(raw.tables.len(), 1);
    assert_eq!(raw.tables[0].file.to_str(), Some("people.dat"));
    assert_eq!(raw.tables[0].fields[1].r#type, Type::String);

    let reopened = Database::open(config(dir.path())).unwrap();
    let mut scan = reopened
        .seq_scan(reopened.begin_transaction(), "people", Some("p"))
        .unwrap();
    assert_eq!(scan.schema().unwrap().field_name(0).unwrap(), Some("p.id"));
    scan.open().unwrap();
    let rows: Vec<String> = scan
        .collect_remaining()
        .unwrap()
        .iter()
        .map(|t| t.to_string())
        .collect();
    assert_eq!(
        rows,
        vec!["1\tada\n", "2\tgrace\n", "3\tedsger\n", "4\tbarbara\n"]
    );
}

#[timeout(5000)]
#[test]
fn test_catalog_loaded_from_text_conversion() {
    let dir = tempdir().unwrap();
    let text = dir.path().join("people.txt");
    fs::write(&text, "1,ada\n\n2,grace\n").unwrap();
    HeapFileEncoder::new(people_schema(), PAGE_SIZE)
        .unwrap()
        .convert_text(&text, &dir.path().join("people.dat"), ',')
        .unwrap();

    let catalog_path = dir.path().join("tables.json");
    fs::write(
        &catalog_path,
        r#"{"tables":[{"name":"people","file":"people.dat",
            "fields":[{"name":"id","type":"int"},{"name":"name","type":"string"}]}]}"#,
    )
    .unwrap();

    let catalog = load_catalog(&catalog_path, PAGE_SIZE).unwrap();
    let id = catalog.table_id("people").unwrap();
    let file = catalog.heap_file(id).unwrap();
    assert_eq!(file.num_pages().unwrap(), 1);
    assert_eq!(catalog.schema(id).unwrap().num_fields(), 2);
    assert_eq!(catalog.table_name(id).unwrap(), "people");
}
