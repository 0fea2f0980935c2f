use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::error::{FillError, Result};
use crate::geocode::{Geocoder, LookupOutcome, OutcomeKind, RateLimitPolicy, RateLimiter};
use crate::io::{OutputWorkbook, load_table, resolve_output_path};
use crate::model::{ColumnMapping, PresetColumns, Role, Table};
use crate::normalize::{address_for_row, prepare_table};
use crate::prompt::{PromptSource, acquire_column_mapping, acquire_input_path};
use crate::validate::correct_mapping;

/// File name the output is written to unless another one is requested.
pub const DEFAULT_OUTPUT: &str = "gps_coordinates.xlsx";

/// Everything a run needs besides the prompt source and the geocoder.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Input workbook; asked for when absent or invalid.
    pub input: Option<PathBuf>,
    /// Column headers known up front; the rest are asked for.
    pub columns: PresetColumns,
    pub output: PathBuf,
    /// Replace an existing output file instead of picking a fresh name.
    pub overwrite: bool,
    pub policy: RateLimitPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            input: None,
            columns: PresetColumns::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            overwrite: false,
            policy: RateLimitPolicy::default(),
        }
    }
}

/// Tally of a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnrichmentReport {
    pub output: PathBuf,
    pub rows: usize,
    pub found: usize,
    pub not_found: usize,
    pub retries_exhausted: usize,
    pub unexpected: usize,
    /// Zero-based data row indices left without coordinates.
    pub unresolved_rows: Vec<usize>,
}

impl EnrichmentReport {
    fn new(output: &Path) -> Self {
        Self {
            output: output.to_path_buf(),
            ..Self::default()
        }
    }

    fn record(&mut self, row: usize, kind: OutcomeKind) {
        self.rows += 1;
        match kind {
            OutcomeKind::Found => self.found += 1,
            OutcomeKind::NotFound => self.not_found += 1,
            OutcomeKind::RetriesExhausted => self.retries_exhausted += 1,
            OutcomeKind::Unexpected => self.unexpected += 1,
        }
        if kind != OutcomeKind::Found {
            self.unresolved_rows.push(row);
        }
    }

    pub fn failed(&self) -> usize {
        self.not_found + self.retries_exhausted + self.unexpected
    }

    /// One-line human summary.
    pub fn summary(&self) -> String {
        format!(
            "{} of {} rows geocoded ({} not found, {} gave up after retries, {} unexpected errors)",
            self.found, self.rows, self.not_found, self.retries_exhausted, self.unexpected
        )
    }
}

/// Geocodes every row of a prepared table and writes hits into `workbook`.
///
/// `table` must have gone through [`prepare_table`]. Rows are processed in
/// order; a failed lookup leaves the row's output cell as it was.
#[instrument(
    level = "info",
    skip_all,
    fields(rows = table.rows.len(), output = %workbook.path().display())
)]
pub fn enrich_rows<G: Geocoder>(
    table: &Table,
    mapping: &ColumnMapping,
    limiter: &mut RateLimiter<G>,
    workbook: &mut OutputWorkbook,
) -> Result<EnrichmentReport> {
    let gps_header = mapping.header(Role::Gps);
    let gps_column = table
        .column_index(gps_header)
        .ok_or_else(|| FillError::UnknownColumn(gps_header.to_string()))?;

    let mut report = EnrichmentReport::new(workbook.path());

    for row in 0..table.rows.len() {
        let address = address_for_row(table, mapping, row)?;
        debug!(row, %address, "geocoding row");

        let outcome = limiter.lookup(&address);
        report.record(row, outcome.kind());

        if let LookupOutcome::Found(coordinates) = outcome {
            let (sheet_row, sheet_col) = table.sheet_position(row, gps_column);
            workbook.set_text(sheet_row, sheet_col, coordinates.to_string())?;
        }
    }

    info!(
        found = report.found,
        not_found = report.not_found,
        retries_exhausted = report.retries_exhausted,
        unexpected = report.unexpected,
        "rows processed"
    );
    Ok(report)
}

/// Runs the whole tool: acquire input, validate columns, enrich, save.
#[instrument(level = "info", skip_all)]
pub fn run<P: PromptSource, G: Geocoder>(
    config: &RunConfig,
    prompt: &mut P,
    geocoder: G,
) -> Result<EnrichmentReport> {
    let input = acquire_input_path(prompt, config.input.as_deref())?;
    let mapping = acquire_column_mapping(prompt, &config.columns)?;

    let table = load_table(&input)?;
    let mapping = correct_mapping(&table, mapping, prompt)?;

    let output = resolve_output_path(&config.output, &input, config.overwrite)?;
    let mut workbook = OutputWorkbook::duplicate(&input, &output)?;

    let table = prepare_table(table, &mapping)?;
    let mut limiter = RateLimiter::new(geocoder, config.policy);
    let report = enrich_rows(&table, &mapping, &mut limiter, &mut workbook)?;

    workbook.save()?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_tracks_unresolved_rows() {
        let mut report = EnrichmentReport::new(Path::new(DEFAULT_OUTPUT));
        report.record(0, OutcomeKind::Found);
        report.record(1, OutcomeKind::NotFound);
        report.record(2, OutcomeKind::RetriesExhausted);
        report.record(3, OutcomeKind::Unexpected);

        assert_eq!(report.rows, 4);
        assert_eq!(report.failed(), 3);
        assert_eq!(report.unresolved_rows, vec![1, 2, 3]);
        assert_eq!(
            report.summary(),
            "1 of 4 rows geocoded (1 not found, 1 gave up after retries, 1 unexpected errors)"
        );
    }

    #[test]
    fn default_config_keeps_legacy_output_name() {
        let config = RunConfig::default();
        assert_eq!(config.output, PathBuf::from("gps_coordinates.xlsx"));
        assert!(!config.overwrite);
    }
}
