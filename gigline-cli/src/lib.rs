//! Command-line interface for the gigline ingestion pipeline.
#![forbid(unsafe_code)]

use std::io::Write;

use clap::{Parser, Subcommand};

mod error;
mod ingest;
mod report;
mod reset;

pub use error::CliError;

use ingest::{DefaultEventSourceBuilder, EventSourceBuilder, IngestArgs};
use report::ReportArgs;
use reset::ResetArgs;

const ARG_GENRE: &str = "genre";
const ARG_API_KEY: &str = "api-key";
const ARG_DATABASE: &str = "database";
const ARG_CURSOR_DIR: &str = "cursor-dir";
const ARG_BASE_URL: &str = "base-url";
const ARG_COUNTRY_CODE: &str = "country-code";
const ARG_START_DATE_TIME: &str = "start-date-time";
const ARG_END_DATE_TIME: &str = "end-date-time";
const ARG_PAGE_SIZE: &str = "page-size";
const ARG_MAX_PAGES: &str = "max-pages";
const ARG_MAX_ATTEMPTS: &str = "max-attempts";
const ARG_RETRY_BACKOFF_MS: &str = "retry-backoff-ms";
const ARG_OUTPUT_DIR: &str = "output-dir";

const ENV_INGEST_GENRE: &str = "GIGLINE_CMDS_INGEST_GENRE";
const ENV_INGEST_API_KEY: &str = "GIGLINE_CMDS_INGEST_API_KEY";
const ENV_RESET_GENRE: &str = "GIGLINE_CMDS_RESET_CURSOR_GENRE";

const DEFAULT_DATABASE: &str = "ticketmaster_data.db";
const DEFAULT_CURSOR_DIR: &str = ".";
const DEFAULT_OUTPUT_DIR: &str = ".";
const DEFAULT_COUNTRY_CODE: &str = "US";

/// Run the gigline CLI with the current process arguments and environment.
///
/// # Errors
///
/// Returns [`CliError`] when arguments or configuration are invalid, or when
/// the selected command fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    dispatch(cli.command, &mut stdout)
}

fn dispatch(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    dispatch_with(command, &DefaultEventSourceBuilder, writer)
}

fn dispatch_with(
    command: Command,
    builder: &dyn EventSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    match command {
        Command::Ingest(args) => ingest::run_ingest_with(args, builder, writer),
        Command::Report(args) => report::run_report_with(args, writer),
        Command::ResetCursor(args) => reset::run_reset_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "gigline",
    about = "Incremental Ticketmaster event ingestion and reporting",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Fetch the next page(s) of events for a genre and store them.
    Ingest(IngestArgs),
    /// Aggregate stored events into text reports.
    Report(ReportArgs),
    /// Rewind a genre's cursor to the first page.
    ResetCursor(ResetArgs),
}

#[cfg(test)]
mod tests;
