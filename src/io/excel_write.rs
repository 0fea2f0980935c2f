use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use umya_spreadsheet::Spreadsheet;

use crate::error::{FillError, Result};

/// A byte-for-byte duplicate of the input workbook opened for cell edits.
///
/// The whole package is loaded with umya-spreadsheet, so column widths,
/// merged ranges, styles, number formats and other sheets are written back
/// unchanged by [`save`](OutputWorkbook::save). Edits address the first
/// worksheet, which is the sheet the input table is read from.
pub struct OutputWorkbook {
    path: PathBuf,
    book: Spreadsheet,
    edits: usize,
}

impl OutputWorkbook {
    /// Copies `input` byte for byte to `output` and opens the copy.
    #[instrument(
        level = "info",
        skip_all,
        fields(input = %input.display(), output = %output.display())
    )]
    pub fn duplicate(input: &Path, output: &Path) -> Result<Self> {
        let bytes = fs::copy(input, output)?;
        debug!(bytes, "duplicated input workbook");
        Self::open(output)
    }

    /// Opens an existing workbook for editing.
    pub fn open(path: &Path) -> Result<Self> {
        let book = umya_spreadsheet::reader::xlsx::read(path)
            .map_err(|error| FillError::ExcelEdit(error.to_string()))?;
        if book.get_sheet_collection().is_empty() {
            return Err(FillError::InvalidWorkbook(format!(
                "{} has no worksheets",
                path.display()
            )));
        }

        Ok(Self {
            path: path.to_path_buf(),
            book,
            edits: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of cells edited since the workbook was opened.
    pub fn edits(&self) -> usize {
        self.edits
    }

    /// Text of a cell on the first worksheet, zero-based; empty when unset.
    pub fn cell_text(&self, row: u32, col: u32) -> String {
        self.book
            .get_sheet_collection()
            .first()
            .map(|sheet| sheet.get_value(cell_reference(row, col).as_str()))
            .unwrap_or_default()
    }

    /// Writes text into a cell of the first worksheet, zero-based.
    pub fn set_text(&mut self, row: u32, col: u32, text: impl Into<String>) -> Result<()> {
        let reference = cell_reference(row, col);
        let sheet = self
            .book
            .get_sheet_collection_mut()
            .first_mut()
            .ok_or_else(|| FillError::InvalidWorkbook("workbook has no worksheets".into()))?;
        let text = text.into();
        debug!(cell = %reference, %text, "writing cell");
        sheet.get_cell_mut(reference.as_str()).set_value(text);
        self.edits += 1;
        Ok(())
    }

    /// Persists the workbook back to its path.
    #[instrument(level = "info", skip_all, fields(output = %self.path.display()))]
    pub fn save(&self) -> Result<()> {
        umya_spreadsheet::writer::xlsx::write(&self.book, &self.path)
            .map_err(|error| FillError::ExcelEdit(error.to_string()))?;
        info!(edits = self.edits, "workbook saved");
        Ok(())
    }
}

/// Picks the path the output is written to.
///
/// An existing file is only replaced when `overwrite` is set; otherwise the
/// first free `stem-N.ext` sibling is used. The input file is never a valid
/// target.
pub fn resolve_output_path(requested: &Path, input: &Path, overwrite: bool) -> Result<PathBuf> {
    if same_file(requested, input) {
        return Err(FillError::OutputIsInput(requested.to_path_buf()));
    }
    if overwrite || !requested.exists() {
        return Ok(requested.to_path_buf());
    }

    let stem = requested
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "gps_coordinates".to_string());
    let extension = requested
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| "xlsx".to_string());

    let mut counter = 1usize;
    loop {
        let candidate = requested.with_file_name(format!("{stem}-{counter}.{extension}"));
        if !candidate.exists() && !same_file(&candidate, input) {
            warn!(
                requested = %requested.display(),
                chosen = %candidate.display(),
                "output file already exists, writing to a new name"
            );
            return Ok(candidate);
        }
        counter += 1;
    }
}

fn same_file(lhs: &Path, rhs: &Path) -> bool {
    match (fs::canonicalize(lhs), fs::canonicalize(rhs)) {
        (Ok(lhs), Ok(rhs)) => lhs == rhs,
        _ => false,
    }
}

/// A1-style reference for a zero-based position.
pub fn cell_reference(row: u32, col: u32) -> String {
    let mut letters = Vec::new();
    let mut index = col + 1;
    while index > 0 {
        let remainder = (index - 1) % 26;
        letters.push(char::from(b'A' + remainder as u8));
        index = (index - 1) / 26;
    }
    letters.iter().rev().collect::<String>() + &(row + 1).to_string()
}
