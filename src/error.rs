use std::path::PathBuf;

use thiserror::Error;

/// Convenient alias for fallible results returned throughout the crate.
pub type Result<T> = std::result::Result<T, FillError>;

/// Error type covering the failures that can abort a run.
///
/// Geocoding failures are deliberately absent: they are folded into
/// [`LookupOutcome`](crate::geocode::LookupOutcome) at the rate limiter and
/// never stop the row loop.
#[derive(Debug, Error)]
pub enum FillError {
    /// Wrapper for IO failures such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Raised when the JSON run report cannot be serialised.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors raised while loading or saving the duplicated workbook.
    #[error("Excel edit error: {0}")]
    ExcelEdit(String),

    /// Errors bubbled up from the Excel reader implementation.
    #[error("Excel read error: {0}")]
    ExcelRead(#[from] calamine::XlsxError),

    /// Raised when a workbook does not have the shape the pipeline needs.
    #[error("invalid workbook structure: {0}")]
    InvalidWorkbook(String),

    /// Raised when the user provides a path that does not exist.
    #[error("input file not found: {0}")]
    MissingInput(PathBuf),

    /// Raised when the input does not carry the `.xlsx` extension.
    #[error("unsupported file type: {0}")]
    UnsupportedExtension(PathBuf),

    /// Raised when a mapped column header is absent from the sheet.
    #[error("column '{0}' not found in the header row")]
    UnknownColumn(String),

    /// Raised when the output target would overwrite the input file.
    #[error("output file {0} is the input file")]
    OutputIsInput(PathBuf),

    /// Raised when the prompt source reaches end of input before an answer.
    #[error("input closed while waiting for an answer to '{0}'")]
    PromptClosed(String),

    /// Raised when the tracing subscriber fails to initialise.
    #[error("failed to initialise logging: {0}")]
    Logging(String),
}
