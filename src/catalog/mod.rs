//! Catalog construction from a directory of CSV price lists

mod builder;
mod columns;
mod projector;
mod snapshot;
mod source;

pub use builder::{build_catalog, BuildReport, BuildWarning};
pub use columns::{resolve_columns, ColumnIndices, ColumnRole};
pub use projector::{project_row, unit_price};
pub use snapshot::{CatalogSnapshot, ProductEntry};
pub use source::{list_source_files, CsvSource, TabularSource};

#[cfg(test)]
pub use snapshot::make_test_entry;
