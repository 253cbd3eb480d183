//! Immutable catalog values shared between the refresher and query callers

use chrono::{DateTime, Utc};
use serde::Serialize;

/// One product parsed from a price file row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductEntry {
    pub name: String,
    pub price: i64,
    /// Package weight in kilograms
    pub weight: i64,
    pub source_file: String,
    /// `price / weight`, rounded half-to-even
    pub unit_price: i64,
}

/// A fully built catalog state.
///
/// Entries keep file-then-row order. A snapshot is never modified once it
/// has been published; readers hold it through an `Arc`.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    generation: u64,
    entries: Vec<ProductEntry>,
    files: Vec<String>,
    built_at: Option<DateTime<Utc>>,
}

impl CatalogSnapshot {
    /// Create an unpublished snapshot (generation 0) stamped with the current time
    pub fn new(entries: Vec<ProductEntry>, files: Vec<String>) -> Self {
        Self {
            generation: 0,
            entries,
            files,
            built_at: Some(Utc::now()),
        }
    }

    /// The snapshot served before the first publish
    pub fn empty() -> Self {
        Self {
            generation: 0,
            entries: Vec::new(),
            files: Vec::new(),
            built_at: None,
        }
    }

    /// Assigned by the store on publish; 0 for unpublished snapshots
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn entries(&self) -> &[ProductEntry] {
        &self.entries
    }

    /// Files that contributed at least one entry, in encounter order
    pub fn files(&self) -> &[String] {
        &self.files
    }

    /// When the builder finished; `None` for the initial empty snapshot
    pub fn built_at(&self) -> Option<DateTime<Utc>> {
        self.built_at
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProductEntry> {
        self.entries.iter()
    }

    /// Compare content only, ignoring generation and build time
    pub fn same_content(&self, other: &CatalogSnapshot) -> bool {
        self.entries == other.entries && self.files == other.files
    }
}

impl Default for CatalogSnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
pub use tests::make_test_entry;
