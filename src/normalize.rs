//! Table-wide normalisation applied once before the row loop.
//!
//! After [`prepare_table`] no cell is empty and the postal column holds plain
//! integers, which is what [`address_for_row`] relies on.

use crate::error::{FillError, Result};
use crate::model::{AddressRow, ColumnMapping, Role, Table};

/// Value substituted for every empty cell.
pub const MISSING_PLACEHOLDER: &str = "0";

/// Fills missing values and coerces the postal column.
pub fn prepare_table(mut table: Table, mapping: &ColumnMapping) -> Result<Table> {
    fill_missing(&mut table);
    let postal_header = mapping.header(Role::Postal);
    let postal_column = table
        .column_index(postal_header)
        .ok_or_else(|| FillError::UnknownColumn(postal_header.to_string()))?;
    coerce_postal(&mut table, postal_column);
    Ok(table)
}

/// Replaces every blank cell with [`MISSING_PLACEHOLDER`].
pub fn fill_missing(table: &mut Table) {
    for cell in table.rows.iter_mut().flatten() {
        if cell.trim().is_empty() {
            *cell = MISSING_PLACEHOLDER.to_string();
        }
    }
}

/// Rewrites one column so every value is an integer in canonical form.
pub fn coerce_postal(table: &mut Table, column: usize) {
    for row in &mut table.rows {
        if let Some(cell) = row.get_mut(column) {
            *cell = coerce_integer(cell);
        }
    }
}

/// Integer rendering of a cell value; never fails.
///
/// Finite numbers are truncated toward zero. Anything else keeps only its
/// ASCII digits, so `"00-001"` becomes `"1"`, and falls back to `"0"`.
pub fn coerce_integer(value: &str) -> String {
    let trimmed = value.trim();
    if let Ok(number) = trimmed.parse::<f64>() {
        if number.is_finite() {
            let truncated = number.trunc();
            return if truncated == 0.0 {
                "0".to_string()
            } else {
                format!("{truncated}")
            };
        }
    }

    let digits: String = trimmed.chars().filter(char::is_ascii_digit).collect();
    let significant = digits.trim_start_matches('0');
    if significant.is_empty() {
        "0".to_string()
    } else {
        significant.to_string()
    }
}

/// Removes every decimal digit `0`-`9` from `value`.
///
/// Other numeric characters such as `½` or `Ⅻ` belong to the name and stay.
pub fn strip_digits(value: &str) -> String {
    value.chars().filter(|ch| ch.to_digit(10).is_none()).collect()
}

/// Assembles the geocoder input for one data row of a prepared table.
///
/// The city loses its digits and surrounding whitespace; the table itself is
/// left untouched.
pub fn address_for_row(table: &Table, mapping: &ColumnMapping, row: usize) -> Result<AddressRow> {
    let field = |role: Role| -> Result<String> {
        let header = mapping.header(role);
        let column = table
            .column_index(header)
            .ok_or_else(|| FillError::UnknownColumn(header.to_string()))?;
        Ok(table.cell(row, column).unwrap_or_default().to_string())
    };

    Ok(AddressRow {
        street: field(Role::Street)?,
        city: strip_digits(&field(Role::City)?).trim().to_string(),
        postal: field(Role::Postal)?,
    })
}
