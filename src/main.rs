use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::Parser;
use gps_filler::enrich::DEFAULT_OUTPUT;
use gps_filler::geocode::nominatim::{DEFAULT_ENDPOINT, Nominatim};
use gps_filler::geocode::RateLimitPolicy;
use gps_filler::model::PresetColumns;
use gps_filler::prompt::ConsolePrompt;
use gps_filler::{EnrichmentReport, FillError, Result, RunConfig};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    if let Err(error) = init_tracing().and_then(|()| execute(cli)) {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}

fn init_tracing() -> Result<()> {
    // Logs go to stderr so stdout carries only the interactive dialogue.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| FillError::Logging(error.to_string()))
}

fn execute(cli: Cli) -> Result<()> {
    let geocoder = Nominatim::with_endpoint(cli.endpoint.clone());
    let report_path = cli.report.clone();
    let config = cli.into_config();

    let mut prompt = ConsolePrompt::stdio();
    let report = gps_filler::run(&config, &mut prompt, geocoder)?;

    println!(
        "GPS coordinates successfully saved to {}",
        report.output.display()
    );
    println!("{}", report.summary());

    if let Some(path) = report_path {
        write_report(&path, &report)?;
    }
    Ok(())
}

fn write_report(path: &Path, report: &EnrichmentReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Fill GPS coordinates into an Excel sheet of postal addresses."
)]
struct Cli {
    /// Input workbook (.xlsx). Asked for interactively when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Header of the column with street names.
    #[arg(long)]
    street: Option<String>,

    /// Header of the column with city names.
    #[arg(long)]
    city: Option<String>,

    /// Header of the column with postal codes.
    #[arg(long)]
    postal: Option<String>,

    /// Header of the column receiving the coordinates.
    #[arg(long)]
    gps: Option<String>,

    /// Output workbook path.
    #[arg(long, default_value = DEFAULT_OUTPUT)]
    output: PathBuf,

    /// Replace the output file if it already exists.
    #[arg(long)]
    overwrite: bool,

    /// Nominatim base URL.
    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Minimum seconds between two geocoding requests.
    #[arg(long, default_value = "1", value_parser = parse_seconds)]
    min_delay_secs: Duration,

    /// Retries after a transient geocoding failure.
    #[arg(long, default_value_t = 2)]
    max_retries: u32,

    /// Seconds to wait before retrying a failed request.
    #[arg(long, default_value = "3", value_parser = parse_seconds)]
    error_wait_secs: Duration,

    /// Optional path for a JSON summary of the run.
    #[arg(long)]
    report: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> RunConfig {
        RunConfig {
            input: self.input,
            columns: PresetColumns {
                street: self.street,
                city: self.city,
                postal: self.postal,
                gps: self.gps,
            },
            output: self.output,
            overwrite: self.overwrite,
            policy: RateLimitPolicy {
                min_delay: self.min_delay_secs,
                max_retries: self.max_retries,
                error_wait: self.error_wait_secs,
            },
        }
    }
}

/// Parses a non-negative, finite number of seconds.
fn parse_seconds(value: &str) -> std::result::Result<Duration, String> {
    let seconds: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number of seconds"))?;
    Duration::try_from_secs_f64(seconds)
        .map_err(|_| format!("'{value}' must be a finite, non-negative number of seconds"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_accept_fractions_and_zero() {
        assert_eq!(parse_seconds("1"), Ok(Duration::from_secs(1)));
        assert_eq!(parse_seconds("0.25"), Ok(Duration::from_millis(250)));
        assert_eq!(parse_seconds("0"), Ok(Duration::ZERO));
    }

    #[test]
    fn seconds_reject_negative_and_non_finite() {
        for value in ["-1", "NaN", "inf", "soon"] {
            assert!(parse_seconds(value).is_err(), "{value} accepted");
        }
    }

    #[test]
    fn invalid_delay_is_a_usage_error() {
        let parsed = Cli::try_parse_from(["gps-filler", "--min-delay-secs", "-1"]);
        assert!(parsed.is_err());

        let cli = Cli::try_parse_from(["gps-filler"]).expect("defaults parse");
        let config = cli.into_config();
        assert_eq!(config.policy, RateLimitPolicy::default());
    }
}
