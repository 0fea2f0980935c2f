//! Interactive acquisition of the input path and the column mapping.
//!
//! Questions go through [`PromptSource`] so the retry loops can be driven by
//! the console in the binary and by scripted input in tests.

use std::io::{self, BufRead, StdinLock, Stdout, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{FillError, Result};
use crate::model::{ColumnMapping, PresetColumns, Role};

/// Extension accepted for input workbooks, compared case-insensitively.
pub const EXPECTED_EXTENSION: &str = "xlsx";

const INPUT_QUESTION: &str = "Put the Excel file into the directory you are running this tool \
                              from. What is the name of the Excel file? (Write it as \
                              filename.extension) ";
const RETRY_QUESTION: &str = "Try again: ";

/// Source of answers to interactive questions.
pub trait PromptSource {
    /// Shows `question` and returns the answer without surrounding whitespace.
    fn ask(&mut self, question: &str) -> Result<String>;

    /// Shows an informational line.
    fn notify(&mut self, message: &str) -> Result<()>;
}

/// [`PromptSource`] reading answers line by line and writing questions to `output`.
#[derive(Debug)]
pub struct ConsolePrompt<R, W> {
    input: R,
    output: W,
}

impl ConsolePrompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> PromptSource for ConsolePrompt<R, W> {
    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(FillError::PromptClosed(question.trim().to_string()));
        }
        Ok(line.trim().to_string())
    }

    fn notify(&mut self, message: &str) -> Result<()> {
        writeln!(self.output, "{message}")?;
        Ok(())
    }
}

/// Reasons a candidate input path is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathProblem {
    Missing,
    WrongExtension,
}

impl PathProblem {
    fn message(self) -> &'static str {
        match self {
            PathProblem::Missing => {
                "Such file does not exist. Did you put it into the right directory? \
                 Is the name of the file right?"
            }
            PathProblem::WrongExtension => {
                "I cannot process such file. Give me a file with .xlsx extension \
                 (Excel file of version 2007 and later.)"
            }
        }
    }
}

/// Checks that `path` exists and ends in `.xlsx` (any case).
pub fn validate_input_path(path: &Path) -> std::result::Result<(), PathProblem> {
    if !path.exists() {
        return Err(PathProblem::Missing);
    }
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(EXPECTED_EXTENSION));
    if !has_extension {
        return Err(PathProblem::WrongExtension);
    }
    Ok(())
}

/// Asks for the input workbook until a valid path is given.
///
/// A `preset` path is checked first and only replaced if it is invalid.
pub fn acquire_input_path<P: PromptSource>(
    prompt: &mut P,
    preset: Option<&Path>,
) -> Result<PathBuf> {
    let mut candidate = match preset {
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(prompt.ask(INPUT_QUESTION)?),
    };

    loop {
        match validate_input_path(&candidate) {
            Ok(()) => {
                debug!(input = %candidate.display(), "input file accepted");
                return Ok(candidate);
            }
            Err(problem) => {
                prompt.notify(problem.message())?;
                candidate = PathBuf::from(prompt.ask(RETRY_QUESTION)?);
            }
        }
    }
}

/// Collects a header for each role, asking only for roles without a preset.
///
/// Nothing is validated here; see [`correct_mapping`](crate::validate::correct_mapping).
pub fn acquire_column_mapping<P: PromptSource>(
    prompt: &mut P,
    presets: &PresetColumns,
) -> Result<ColumnMapping> {
    let mut mapping = ColumnMapping::new("", "", "", "");
    for role in Role::ALL {
        let header = match presets.get(role) {
            Some(header) => header.to_string(),
            None => prompt.ask(role.question())?,
        };
        mapping.set_header(role, header);
    }
    Ok(mapping)
}
