//! Price Catalog - searchable product catalog built from CSV price lists
//!
//! A background refresher rescans a directory of price files on a fixed
//! interval and publishes each rebuilt catalog as an immutable snapshot.
//! Queries run against whichever snapshot is current and rank matching
//! products by price per kilogram.

pub mod catalog;
pub mod config;
pub mod error;
pub mod matcher;
pub mod report;
pub mod store;

pub use catalog::{BuildReport, BuildWarning, CatalogSnapshot, ColumnRole, ProductEntry};
pub use config::{HeaderSynonyms, RefreshConfig};
pub use error::{CatalogError, Error, Result};
pub use matcher::find_matches;
pub use report::{export_html, format_table, render_json};
pub use store::{CatalogStore, RefreshOutcome};
