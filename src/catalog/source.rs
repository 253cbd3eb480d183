//! Price file discovery and raw CSV decoding

use std::path::Path;

use crate::error::{CatalogError, Result};

/// Produces the raw rows of one tabular file, header row included
pub trait TabularSource: Send + Sync {
    fn read_rows(&self, path: &Path) -> Result<Vec<Vec<String>>>;
}

/// Comma-delimited UTF-8 files read with the `csv` crate.
///
/// The header row is returned as an ordinary row; rows may differ in length.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvSource;

impl TabularSource for CsvSource {
    fn read_rows(&self, path: &Path) -> Result<Vec<Vec<String>>> {
        let file_name = display_name(path);
        let source_err = |source: csv::Error| CatalogError::Source {
            file: file_name.clone(),
            source,
        };

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(source_err)?;

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in rdr.records() {
            let record = record.map_err(source_err)?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(rows)
    }
}

/// List regular files in `dir` whose name contains `pattern` (case-insensitive).
///
/// Names are sorted so repeated scans of an unchanged directory yield the
/// same order.
pub fn list_source_files(dir: &Path, pattern: &str) -> Result<Vec<String>> {
    let listing_err = |source: std::io::Error| CatalogError::Listing {
        dir: dir.to_path_buf(),
        source,
    };

    let pattern = pattern.to_lowercase();
    let mut names = Vec::new();

    for entry in std::fs::read_dir(dir).map_err(listing_err)? {
        let entry = entry.map_err(listing_err)?;
        if !entry.path().is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy().to_string();
        if name.to_lowercase().contains(&pattern) {
            names.push(name);
        }
    }

    names.sort();
    log::debug!(
        "Found {} candidate file(s) in {}",
        names.len(),
        dir.display()
    );
    Ok(names)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
