//! Bulk construction of heap files from rows of values.

use std::fs::{self, File};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;

use crate::error::DbError;
use crate::io_utils::classify_io_error;
use crate::storage::{slots_per_page, HeapPage};
use crate::tuple::{Schema, Tuple};
use crate::types::Value;

/// Packs rows into consecutive, fully used pages of a new heap file.
#[derive(Debug, Clone)]
pub struct HeapFileEncoder {
    schema: Arc<Schema>,
    page_size: usize,
    tuples_per_page: usize,
}

impl HeapFileEncoder {
    /// Creates an encoder for tuples of `schema` on pages of `page_size` bytes.
    pub fn new(schema: Arc<Schema>, page_size: usize) -> Result<Self, DbError> {
        let Some(tuples_per_page) = slots_per_page(page_size, schema.size()) else {
            return Err(DbError::InvalidConfig(format!(
                "page size {} is too large",
                page_size
            )));
        };
        if tuples_per_page == 0 {
            return Err(DbError::InvalidConfig(format!(
                "page size {} cannot hold a tuple of {} bytes",
                page_size,
                schema.size()
            )));
        }
        Ok(Self {
            schema,
            page_size,
            tuples_per_page,
        })
    }

    /// Returns how many tuples fit on one page.
    pub fn tuples_per_page(&self) -> usize {
        self.tuples_per_page
    }

    /// Writes `rows` to a new file at `path`, replacing any existing file.
    ///
    /// At least one page is written, even for no rows. Returns the number of
    /// pages written.
    pub fn write_tuples<I>(&self, path: &Path, rows: I) -> Result<usize, DbError>
    where
        I: IntoIterator<Item = Vec<Value>>,
    {
        let context = format!("write {}", path.display());
        let mut out = File::create(path).map_err(|e| classify_io_error(e, &context))?;

        let mut pending = Vec::with_capacity(self.tuples_per_page);
        let mut pages = 0;
        for values in rows {
            pending.push(Tuple::with_values(Arc::clone(&self.schema), values)?);
            if pending.len() == self.tuples_per_page {
                self.flush_page(&mut out, &mut pending, &context)?;
                pages += 1;
            }
        }
        if !pending.is_empty() || pages == 0 {
            self.flush_page(&mut out, &mut pending, &context)?;
            pages += 1;
        }

        out.sync_all().map_err(|e| classify_io_error(e, &context))?;
        tracing::debug!("Wrote {} pages to {}", pages, path.display());
        Ok(pages)
    }

    /// Converts a text file with one row per line into a heap file.
    ///
    /// Fields are split on `separator` and parsed according to the schema.
    /// Blank lines are skipped. Returns the number of pages written.
    pub fn convert_text(
        &self,
        input: &Path,
        output: &Path,
        separator: char,
    ) -> Result<usize, DbError> {
        let file = File::open(input)
            .map_err(|e| classify_io_error(e, &format!("open {}", input.display())))?;

        let mut rows = Vec::new();
        for (line_no, line) in BufReader::new(file).lines().enumerate() {
            let line =
                line.map_err(|e| classify_io_error(e, &format!("read {}", input.display())))?;
            if line.trim().is_empty() {
                continue;
            }
            rows.push(self.parse_row(&line, separator).map_err(|e| {
                DbError::SerializationError(format!("line {}: {}", line_no + 1, e))
            })?);
        }

        let pages = match self.write_tuples(output, rows) {
            Ok(pages) => pages,
            Err(err) => {
                let _ = fs::remove_file(output);
                return Err(err);
            }
        };
        Ok(pages)
    }

    /// Parses one text row into values of the schema's types.
    pub fn parse_row(&self, line: &str, separator: char) -> Result<Vec<Value>, DbError> {
        let parts: Vec<&str> = line.split(separator).collect();
        if parts.len() != self.schema.num_fields() {
            return Err(DbError::SerializationError(format!(
                "expected {} fields, found {}",
                self.schema.num_fields(),
                parts.len()
            )));
        }
        self.schema
            .items()
            .zip(parts)
            .map(|(item, text)| item.field_type.parse_text(text))
            .collect()
    }

    fn flush_page(
        &self,
        out: &mut File,
        pending: &mut Vec<Tuple>,
        context: &str,
    ) -> Result<(), DbError> {
        let data = HeapPage::encode(&self.schema, pending, self.page_size)?;
        out.write_all(&data)
            .map_err(|e| classify_io_error(e, context))?;
        pending.clear();
        Ok(())
    }
}
