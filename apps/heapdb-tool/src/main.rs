//! CLI tool for building and inspecting heap files.
//!
//! Provides commands for:
//! - Converting delimited text into heap files
//! - Page-level inspection of a heap file
//! - Sequential scans of tables described by a catalog file

mod cli;

use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use heapdb_core::config::DbConfig;
use heapdb_core::execution::{DbFileIterator, DbIterator};
use heapdb_core::heap::{HeapFile, HeapFileEncoder};
use heapdb_core::storage::HeapPageId;
use heapdb_core::tuple::Schema;
use heapdb_core::types::Type;
use heapdb_core::{Database, DbError};
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.command {
        Commands::Convert {
            input,
            output,
            types,
            separator,
            page_size,
        } => convert(&input, &output, &types, separator, page_size, &mut out)?,
        Commands::Info {
            file,
            types,
            page_size,
        } => info(&file, &types, page_size, &mut out)?,
        Commands::Scan {
            catalog,
            table,
            alias,
            page_size,
            buffer_pool_pages,
        } => scan(
            &catalog,
            &table,
            alias.as_deref(),
            DbConfig {
                page_size,
                buffer_pool_pages,
                ..DbConfig::default()
            },
            &mut out,
        )?,
    }

    out.flush().context("Failed to flush output")?;
    Ok(())
}

/// Parses a comma-separated type list such as `int,string`.
fn parse_types(types: &str) -> Result<Arc<Schema>> {
    let types = types
        .split(',')
        .map(|t| t.trim().parse::<Type>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("Invalid type list '{}'", types))?;
    Ok(Arc::new(Schema::from_types(types)?))
}

fn convert(
    input: &Path,
    output: &Path,
    types: &str,
    separator: char,
    page_size: usize,
    out: &mut impl Write,
) -> Result<()> {
    let schema = parse_types(types)?;
    let encoder = HeapFileEncoder::new(schema, page_size)?;
    let pages = encoder
        .convert_text(input, output, separator)
        .with_context(|| format!("Failed to convert {}", input.display()))?;
    tracing::info!("Converted {} into {}", input.display(), output.display());
    writeln!(
        out,
        "wrote {} pages ({} tuples per page) to {}",
        pages,
        encoder.tuples_per_page(),
        output.display()
    )?;
    Ok(())
}

fn info(file: &Path, types: &str, page_size: usize, out: &mut impl Write) -> Result<()> {
    let schema = parse_types(types)?;
    let heap_file = HeapFile::with_page_size(file, schema, page_size)?;
    let len = std::fs::metadata(heap_file.path())
        .with_context(|| format!("Failed to stat {}", file.display()))?
        .len();
    let pages = heap_file.num_pages()?;

    writeln!(out, "file:      {}", heap_file.path().display())?;
    writeln!(out, "table id:  {}", heap_file.id())?;
    writeln!(out, "length:    {} bytes", len)?;
    writeln!(out, "pages:     {}", pages)?;
    for page_number in 0..pages {
        match heap_file.read_page(HeapPageId::new(heap_file.id(), page_number)) {
            Ok(page) => writeln!(
                out,
                "page {:>5}: {}/{} slots used",
                page_number,
                page.num_tuples(),
                page.num_slots()
            )?,
            Err(err) => writeln!(out, "page {:>5}: unreadable ({})", page_number, err)?,
        }
    }
    Ok(())
}

fn scan(
    catalog: &Path,
    table: &str,
    alias: Option<&str>,
    config: DbConfig,
    out: &mut impl Write,
) -> Result<()> {
    if !catalog.is_file() {
        bail!("Catalog file {} does not exist", catalog.display());
    }
    let Some(file_name) = catalog.file_name() else {
        bail!("Catalog path {} has no file name", catalog.display());
    };
    let config = DbConfig {
        data_dir: catalog
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default(),
        catalog_file: file_name.to_string_lossy().into_owned(),
        ..config
    };

    let db = Database::open(config)
        .with_context(|| format!("Failed to load catalog {}", catalog.display()))?;
    let mut scan = db.seq_scan(db.begin_transaction(), table, alias)?;

    let pool_hint = |err: DbError| -> anyhow::Error {
        match err {
            DbError::BufferPoolFull { capacity } => anyhow::Error::new(err).context(format!(
                "Table '{}' needs more than {} cached pages; raise --buffer-pool-pages",
                table, capacity
            )),
            other => other.into(),
        }
    };

    writeln!(out, "{}", scan.schema()?)?;
    scan.open()
        .map_err(pool_hint)
        .with_context(|| format!("Failed to open table '{}'", table))?;
    let mut count = 0usize;
    while scan.has_next()? {
        write!(out, "{}", scan.next().map_err(pool_hint)?)?;
        count += 1;
    }
    scan.close();
    tracing::info!("Scanned {} tuples from '{}'", count, table);
    Ok(())
}
