//! # Field Catalog Error Types
//!
//! - **Load Errors**: the field mapping source could not be opened or read
//! - **Graph Errors**: a table is missing from the relationship graph, or two
//!   tables are not connected
//!
//! Only failing to open or read the source at all is surfaced as a load error.
//! Problems with individual rows (too few columns, undecodable records) are
//! logged and the row is skipped.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to open field mapping file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read field mapping source: {0}")]
    Read(#[from] csv::Error),
}

/// Errors from join path discovery over the relationship graph
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GraphError {
    #[error("table {table} not found in relationship graph")]
    TableNotFound { table: String },
    #[error("no join path found between {from} and {to}")]
    NoPathFound { from: String, to: String },
}
