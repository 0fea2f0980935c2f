//! Spreadsheet adapters: calamine for reading the table, umya-spreadsheet for
//! editing the duplicated workbook.

pub mod excel_read;
pub mod excel_write;

pub use excel_read::load_table;
pub use excel_write::{OutputWorkbook, cell_reference, resolve_output_path};
