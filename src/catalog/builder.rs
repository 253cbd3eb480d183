//! Catalog building: load, resolve and project every candidate file
//!
//! Problems with individual files or rows never fail the build. They are
//! collected as [`BuildWarning`]s next to the snapshot and logged.

use std::fmt;
use std::path::Path;

use crate::catalog::columns::{resolve_columns, ColumnRole};
use crate::catalog::projector::project_row;
use crate::catalog::snapshot::{CatalogSnapshot, ProductEntry};
use crate::catalog::source::TabularSource;
use crate::config::HeaderSynonyms;
use crate::error::CatalogError;

/// A file or row left out of a snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// File could not be read at all
    UnreadableFile { file: String, reason: String },
    /// Header lacks one or more roles; the whole file is skipped
    IncompleteHeader {
        file: String,
        missing: Vec<ColumnRole>,
    },
    /// One data row was skipped (1-based data row index)
    MalformedRow {
        file: String,
        row: usize,
        reason: String,
    },
}

impl BuildWarning {
    pub fn file(&self) -> &str {
        match self {
            BuildWarning::UnreadableFile { file, .. }
            | BuildWarning::IncompleteHeader { file, .. }
            | BuildWarning::MalformedRow { file, .. } => file,
        }
    }
}

impl fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildWarning::UnreadableFile { file, reason } => {
                write!(f, "{}: skipped, {}", file, reason)
            }
            BuildWarning::IncompleteHeader { file, missing } => {
                let roles: Vec<&str> = missing.iter().map(|r| r.as_str()).collect();
                write!(f, "{}: skipped, no column for {}", file, roles.join(", "))
            }
            BuildWarning::MalformedRow { file, row, reason } => {
                write!(f, "{}: row {} skipped, {}", file, row, reason)
            }
        }
    }
}

/// Result of one build: always a complete snapshot plus what was left out
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub snapshot: CatalogSnapshot,
    pub warnings: Vec<BuildWarning>,
}

/// Builds one catalog snapshot from the given files in `dir`.
///
/// Files with fewer than two rows contribute nothing. Entries keep file
/// order, then row order.
pub fn build_catalog(
    dir: &Path,
    files: &[String],
    source: &dyn TabularSource,
    synonyms: &HeaderSynonyms,
) -> BuildReport {
    let mut entries: Vec<ProductEntry> = Vec::new();
    let mut contributing = Vec::new();
    let mut warnings = Vec::new();

    for file in files {
        let before = entries.len();
        load_file(dir, file, source, synonyms, &mut entries, &mut warnings);
        if entries.len() > before {
            contributing.push(file.clone());
        }
    }

    for warning in &warnings {
        log::warn!("{}", warning);
    }
    log::debug!(
        "Built catalog: {} entries from {} of {} file(s), {} warning(s)",
        entries.len(),
        contributing.len(),
        files.len(),
        warnings.len()
    );

    BuildReport {
        snapshot: CatalogSnapshot::new(entries, contributing),
        warnings,
    }
}

fn load_file(
    dir: &Path,
    file: &str,
    source: &dyn TabularSource,
    synonyms: &HeaderSynonyms,
    entries: &mut Vec<ProductEntry>,
    warnings: &mut Vec<BuildWarning>,
) {
    let rows = match source.read_rows(&dir.join(file)) {
        Ok(rows) => rows,
        Err(e) => {
            warnings.push(BuildWarning::UnreadableFile {
                file: file.to_string(),
                reason: e.to_string(),
            });
            return;
        }
    };

    let Some((header, data)) = rows.split_first() else {
        return;
    };
    if data.is_empty() {
        log::debug!("{}: no data rows, skipping", file);
        return;
    }

    let indices = match resolve_columns(header, synonyms) {
        Ok(indices) => indices,
        Err(CatalogError::IncompleteHeader { missing }) => {
            warnings.push(BuildWarning::IncompleteHeader {
                file: file.to_string(),
                missing,
            });
            return;
        }
        Err(e) => {
            warnings.push(BuildWarning::UnreadableFile {
                file: file.to_string(),
                reason: e.to_string(),
            });
            return;
        }
    };

    for (offset, fields) in data.iter().enumerate() {
        let row = offset + 1;
        match project_row(&indices, fields, file, row) {
            Ok(entry) => entries.push(entry),
            Err(CatalogError::MalformedRow { reason, .. }) => {
                warnings.push(BuildWarning::MalformedRow {
                    file: file.to_string(),
                    row,
                    reason,
                });
            }
            Err(e) => {
                warnings.push(BuildWarning::MalformedRow {
                    file: file.to_string(),
                    row,
                    reason: e.to_string(),
                });
            }
        }
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
