//! JSON catalog files.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::DbError;
use crate::heap::HeapFile;
use crate::io_utils::classify_io_error;
use crate::tuple::{Schema, SchemaItem};
use crate::types::Type;

use super::{Catalog, MemoryCatalog};

/// Catalog file format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Table definitions
    pub tables: Vec<TableEntry>,
}

/// Table definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableEntry {
    /// Table name
    pub name: String,
    /// Heap file path, relative to the catalog file's directory unless absolute
    pub file: PathBuf,
    /// Field definitions
    pub fields: Vec<FieldEntry>,
    /// Primary key field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
}

/// Field definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Field name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Field type
    pub r#type: Type,
}

impl TableEntry {
    fn schema(&self) -> Result<Schema, DbError> {
        let items = self
            .fields
            .iter()
            .map(|f| SchemaItem::new(f.r#type, f.name.clone()))
            .collect();
        Schema::from_items(items).map_err(|e| {
            DbError::InvalidSchema(format!("table '{}': {}", self.name, e))
        })
    }
}

/// Loads the catalog file at `path` into a new `MemoryCatalog`.
///
/// Heap files are opened with `page_size`; they need not exist yet.
pub fn load_catalog(path: &Path, page_size: usize) -> Result<MemoryCatalog, DbError> {
    let mut file =
        File::open(path).map_err(|e| classify_io_error(e, "Failed to open catalog file"))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents)
        .map_err(|e| classify_io_error(e, "Failed to read catalog file"))?;

    let catalog_file: CatalogFile = serde_json::from_str(&contents)
        .map_err(|e| DbError::SerializationError(format!("Failed to parse catalog: {}", e)))?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let catalog = MemoryCatalog::new();
    for entry in &catalog_file.tables {
        if let Some(key) = &entry.primary_key {
            if !entry.fields.iter().any(|f| f.name.as_deref() == Some(key)) {
                return Err(DbError::InvalidSchema(format!(
                    "table '{}': primary key '{}' is not a field",
                    entry.name, key
                )));
            }
        }
        let schema = Arc::new(entry.schema()?);
        let file_path = base_dir.join(&entry.file);
        let heap_file = HeapFile::with_page_size(file_path, schema, page_size)?;
        catalog.add_table(
            Arc::new(heap_file),
            entry.name.clone(),
            entry.primary_key.clone(),
        )?;
    }

    tracing::debug!(
        "Loaded {} tables from catalog {}",
        catalog_file.tables.len(),
        path.display()
    );
    Ok(catalog)
}

/// Writes `catalog` to `path`.
///
/// Heap file paths under the catalog file's directory are stored relative to
/// it. The file is written to a temporary sibling and renamed into place.
pub fn save_catalog(catalog: &MemoryCatalog, path: &Path) -> Result<(), DbError> {
    let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
    let abs_base = std::path::absolute(base_dir)
        .map_err(|e| classify_io_error(e, "Failed to resolve catalog directory"))?;

    let mut tables = Vec::new();
    for table_id in catalog.table_ids()? {
        let heap_file = catalog.heap_file(table_id)?;
        let file = match heap_file.path().strip_prefix(&abs_base) {
            Ok(relative) => relative.to_path_buf(),
            Err(_) => heap_file.path().to_path_buf(),
        };
        let fields = heap_file
            .schema()
            .items()
            .map(|item| FieldEntry {
                name: item.field_name.clone(),
                r#type: item.field_type,
            })
            .collect();
        tables.push(TableEntry {
            name: catalog.table_name(table_id)?,
            file,
            fields,
            primary_key: catalog.primary_key(table_id)?,
        });
    }
    tables.sort_by(|a, b| a.name.cmp(&b.name));

    let json = serde_json::to_string_pretty(&CatalogFile { tables })
        .map_err(|e| DbError::SerializationError(e.to_string()))?;

    if !base_dir.as_os_str().is_empty() {
        fs::create_dir_all(base_dir)
            .map_err(|e| classify_io_error(e, "Failed to create catalog directory"))?;
    }

    let mut temp_name = path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);

    let mut file = File::create(&temp_path)
        .map_err(|e| classify_io_error(e, "Failed to create temp file"))?;
    file.write_all(json.as_bytes())
        .map_err(|e| classify_io_error(e, "Failed to write catalog"))?;
    file.sync_all()
        .map_err(|e| classify_io_error(e, "Failed to sync catalog"))?;

    fs::rename(&temp_path, path)
        .map_err(|e| classify_io_error(e, "Failed to rename catalog file"))?;

    tracing::debug!("Saved catalog to {}", path.display());
    Ok(())
}
