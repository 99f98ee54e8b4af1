//! Shared fixtures.

use std::path::Path;
use std::sync::Arc;

use heapdb_core::config::DbConfig;
use heapdb_core::heap::HeapFileEncoder;
use heapdb_core::tuple::Schema;
use heapdb_core::types::{Type, Value};
use heapdb_core::Database;

/// Page size giving exactly three `(int, string)` tuples per page.
pub const PAGE_SIZE: usize = 512;

pub fn people_schema() -> Arc<Schema> {
    Arc::new(Schema::named(&[(Type::Int, "id"), (Type::String, "name")]).unwrap())
}

pub fn person(id: i32, name: &str) -> Vec<Value> {
    vec![Value::Int(id), Value::string(name)]
}

/// Writes `rows` as a heap file named `file` inside `dir`.
pub fn write_people(dir: &Path, file: &str, rows: Vec<Vec<Value>>) -> usize {
    HeapFileEncoder::new(people_schema(), PAGE_SIZE)
        .unwrap()
        .write_tuples(&dir.join(file), rows)
        .unwrap()
}

/// Four people: three on page 0, one on page 1.
pub fn four_people() -> Vec<Vec<Value>> {
    vec![
        person(1, "ada"),
        person(2, "grace"),
        person(3, "edsger"),
        person(4, "barbara"),
    ]
}

pub fn config(dir: &Path) -> DbConfig {
    DbConfig {
        page_size: PAGE_SIZE,
        data_dir: dir.to_path_buf(),
        ..DbConfig::default()
    }
}

/// Database with a `people` table holding [`four_people`].
pub fn people_db(dir: &Path) -> Database {
    write_people(dir, "people.dat", four_people());
    let db = Database::new(config(dir)).unwrap();
    db.add_table("people", "people.dat", people_schema(), Some("id".to_string()))
        .unwrap();
    db
}
