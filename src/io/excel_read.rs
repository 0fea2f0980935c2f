use std::path::Path;

use calamine::{DataType, Range, Reader, Xlsx, open_workbook};
use tracing::debug;

use crate::error::{FillError, Result};
use crate::model::Table;

/// Reads the first worksheet of an `.xlsx` file into a [`Table`].
///
/// The first used row becomes the header row; every following row becomes a
/// data row padded to the header width. Empty cells are kept as empty strings
/// so row indices stay aligned with the sheet.
pub fn load_table(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = read_first_sheet(&mut workbook)?;
    let table = range_to_table(&range);
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "loaded table from first worksheet"
    );
    Ok(table)
}

fn read_first_sheet<R: std::io::Read + std::io::Seek>(
    workbook: &mut Xlsx<R>,
) -> Result<Range<DataType>> {
    let range_result = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FillError::InvalidWorkbook("workbook has no worksheets".into()))?;
    let range = range_result.map_err(FillError::from)?;
    Ok(range)
}

pub(crate) fn range_to_table(range: &Range<DataType>) -> Table {
    let Some(origin) = range.start() else {
        return Table::default();
    };

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(first_row) => first_row
            .iter()
            .map(|cell| cell_to_string(Some(cell)))
            .collect(),
        None => Vec::new(),
    };

    let width = headers.len();
    let rows = rows
        .map(|row| {
            let mut cells: Vec<String> = row
                .iter()
                .map(|cell| cell_to_string(Some(cell)))
                .collect();
            cells.resize(width, String::new());
            cells
        })
        .collect();

    Table {
        headers,
        rows,
        origin,
    }
}

pub(crate) fn cell_to_string(cell: Option<&DataType>) -> String {
    match cell {
        Some(DataType::String(value)) => value.clone(),
        Some(DataType::Float(value)) => value.to_string(),
        Some(DataType::Int(value)) => value.to_string(),
        Some(DataType::Bool(value)) => value.to_string(),
        Some(DataType::Empty) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
