//! Row projection: turns one raw data row into a typed product entry

use crate::catalog::columns::ColumnIndices;
use crate::catalog::snapshot::ProductEntry;
use crate::error::{CatalogError, Result};

/// Divide and round half-to-even, the rule used for price-per-kilogram.
///
/// `weight` must be non-zero.
pub fn unit_price(price: i64, weight: i64) -> i64 {
    (price as f64 / weight as f64).round_ties_even() as i64
}

/// Parses a whole number field. Surrounding whitespace is tolerated,
/// decimals and currency symbols are not.
fn parse_integer(field: &str, column: &str, row: usize) -> Result<i64> {
    field
        .trim()
        .parse::<i64>()
        .map_err(|e| CatalogError::MalformedRow {
            row,
            reason: format!("{column} '{field}' is not an integer: {e}"),
        })
}

fn field<'a>(fields: &'a [String], index: usize, column: &str, row: usize) -> Result<&'a str> {
    fields
        .get(index)
        .map(String::as_str)
        .ok_or_else(|| CatalogError::MalformedRow {
            row,
            reason: format!("missing {column} column (row has {} fields)", fields.len()),
        })
}

/// Project a data row into a [`ProductEntry`].
///
/// `row` is the 1-based data row index used in error messages. Fails with
/// `MalformedRow` when a field is absent, price or weight is not an integer,
/// or weight is not positive.
pub fn project_row(
    indices: &ColumnIndices,
    fields: &[String],
    source_file: &str,
    row: usize,
) -> Result<ProductEntry> {
    let name = field(fields, indices.name, "name", row)?;
    let price = parse_integer(field(fields, indices.price, "price", row)?, "price", row)?;
    let weight = parse_integer(field(fields, indices.weight, "weight", row)?, "weight", row)?;

    if weight <= 0 {
        return Err(CatalogError::MalformedRow {
            row,
            reason: format!("weight {weight} is not positive"),
        });
    }

    Ok(ProductEntry {
        name: name.to_string(),
        price,
        weight,
        source_file: source_file.to_string(),
        unit_price: unit_price(price, weight),
    })
}

#[cfg(test)]
#[path = "projector_tests.rs"]
mod tests;
