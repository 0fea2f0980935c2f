//! Core library for the gps-filler command line application.
//!
//! The tool reads a spreadsheet of postal addresses, geocodes every row and
//! writes `latitude, longitude` text into a copy of the workbook. Console
//! interaction lives in [`prompt`] and [`validate`], spreadsheet IO under
//! [`io`], table clean-up in [`normalize`], lookups and throttling in
//! [`geocode`], and the row loop plus orchestration in [`enrich`].

pub mod enrich;
pub mod error;
pub mod geocode;
pub mod io;
pub mod model;
pub mod normalize;
pub mod prompt;
pub mod validate;

pub use enrich::{EnrichmentReport, RunConfig, run};
pub use error::{FillError, Result};
