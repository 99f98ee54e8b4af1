use std::path::PathBuf;

use clap::{Parser, Subcommand};
use heapdb_core::config::PAGE_SIZE;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert a delimited text file into a heap file
    Convert {
        /// Text file with one row per line
        #[arg(short, long)]
        input: PathBuf,

        /// Heap file to write
        #[arg(short, long)]
        output: PathBuf,

        /// Field types (comma-separated, e.g. "int,string")
        #[arg(short, long)]
        types: String,

        /// Field separator
        #[arg(short, long, default_value_t = ',')]
        separator: char,

        /// Page size in bytes
        #[arg(long, default_value_t = PAGE_SIZE)]
        page_size: usize,
    },

    /// Print page statistics of a heap file
    Info {
        /// Heap file to inspect
        #[arg(short, long)]
        file: PathBuf,

        /// Field types (comma-separated, e.g. "int,string")
        #[arg(short, long)]
        types: String,

        /// Page size in bytes
        #[arg(long, default_value_t = PAGE_SIZE)]
        page_size: usize,
    },

    /// Print every tuple of a catalog table
    Scan {
        /// Catalog file describing the tables
        #[arg(short, long)]
        catalog: PathBuf,

        /// Table to scan
        #[arg(short, long)]
        table: String,

        /// Alias used to qualify field names (defaults to the table name)
        #[arg(short, long)]
        alias: Option<String>,

        /// Page size in bytes
        #[arg(long, default_value_t = PAGE_SIZE)]
        page_size: usize,

        /// Maximum number of cached pages
        #[arg(long, default_value_t = heapdb_core::config::DEFAULT_BUFFER_POOL_PAGES)]
        buffer_pool_pages: usize,
    },
}
