//! Header row resolution: maps free-form column labels onto semantic roles

use crate::config::{normalize_label, HeaderSynonyms};
use crate::error::{CatalogError, Result};

/// Semantic role of a price file column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    Name,
    Price,
    Weight,
}

impl ColumnRole {
    /// All roles in resolution priority order
    pub const ALL: [ColumnRole; 3] = [ColumnRole::Name, ColumnRole::Price, ColumnRole::Weight];

    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnRole::Name => "name",
            ColumnRole::Price => "price",
            ColumnRole::Weight => "weight",
        }
    }
}

/// Resolved column positions for one price file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub name: usize,
    pub price: usize,
    pub weight: usize,
}

/// Resolve the column index of every role from a header row.
///
/// Cells are normalized (BOM, trim, lowercase) and tested against the
/// synonym sets in `ColumnRole::ALL` order. The first cell matching a role
/// that is still unassigned claims it; later duplicates are ignored. Fails
/// with `IncompleteHeader` naming every role left unassigned.
pub fn resolve_columns<S: AsRef<str>>(
    header: &[S],
    synonyms: &HeaderSynonyms,
) -> Result<ColumnIndices> {
    let mut slots: [Option<usize>; 3] = [None; 3];

    for (index, cell) in header.iter().enumerate() {
        let label = normalize_label(cell.as_ref());
        if label.is_empty() {
            continue;
        }

        let open_slot = (0..ColumnRole::ALL.len())
            .find(|&slot| slots[slot].is_none() && synonyms.matches(ColumnRole::ALL[slot], &label));

        if let Some(slot) = open_slot {
            slots[slot] = Some(index);
        } else if ColumnRole::ALL.iter().any(|role| synonyms.matches(*role, &label)) {
            log::debug!(
                "Ignoring duplicate column '{}' at index {}",
                cell.as_ref(),
                index
            );
        }
    }

    match slots {
        [Some(name), Some(price), Some(weight)] => Ok(ColumnIndices {
            name,
            price,
            weight,
        }),
        _ => Err(CatalogError::IncompleteHeader {
            missing: ColumnRole::ALL
                .iter()
                .zip(slots.iter())
                .filter(|(_, slot)| slot.is_none())
                .map(|(role, _)| *role)
                .collect(),
        }),
    }
}

#[cfg(test)]
#[path = "columns_tests.rs"]
mod tests;
