//! Product name search ranked by price per kilogram

use crate::catalog::{CatalogSnapshot, ProductEntry};

/// Find entries whose name contains `query` (case-insensitive).
///
/// The query is trimmed first; an empty query matches nothing. Results are
/// ordered by ascending unit price, ties keeping snapshot order.
pub fn find_matches<'a>(snapshot: &'a CatalogSnapshot, query: &str) -> Vec<&'a ProductEntry> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<&ProductEntry> = snapshot
        .iter()
        .filter(|entry| entry.name.to_lowercase().contains(&needle))
        .collect();

    // stable: equal unit prices stay in file-then-row order
    matches.sort_by_key(|entry| entry.unit_price);
    matches
}
