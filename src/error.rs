//! Error types for price_catalog

use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::ColumnRole;

/// Unified error type for price_catalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Source directory could not be listed; aborts one refresh cycle only
    #[error("Failed to list directory {}: {source}", dir.display())]
    Listing {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A price file could not be opened or decoded
    #[error("Failed to read {file}: {source}")]
    Source {
        file: String,
        #[source]
        source: csv::Error,
    },
    /// Header row lacks a column for one or more roles
    #[error("Header is missing columns for: {}", format_roles(missing))]
    IncompleteHeader { missing: Vec<ColumnRole> },
    /// Data row could not be turned into a product
    #[error("Malformed row {row}: {reason}")]
    MalformedRow { row: usize, reason: String },
    /// Synonym configuration file could not be loaded
    #[error("Failed to load synonyms from {}: {reason}", path.display())]
    Synonyms { path: PathBuf, reason: String },
    /// File I/O error (report export)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_roles(roles: &[ColumnRole]) -> String {
    roles
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Short alias used by the re-exports in lib.rs
pub type Error = CatalogError;

/// Result alias for price_catalog operations
pub type Result<T> = std::result::Result<T, CatalogError>;
