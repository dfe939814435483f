//! Ingest command implementation for the gigline CLI.

use std::fmt;
use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use gigline_core::{CursorKey, DEFAULT_PAGE_SIZE, EventQuery, EventSource, MAX_PAGE_SIZE};
use gigline_data::cursor::FileCursorStore;
use gigline_data::pipeline::{PageSummary, Pipeline, RunPolicy, RunReport};
use gigline_data::store::EventDatabase;
use gigline_data::ticketmaster::{DEFAULT_BASE_URL, HttpEventSource, HttpEventSourceConfig};
use log::debug;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{
    ARG_API_KEY, ARG_BASE_URL, ARG_COUNTRY_CODE, ARG_CURSOR_DIR, ARG_DATABASE,
    ARG_END_DATE_TIME, ARG_GENRE, ARG_MAX_ATTEMPTS, ARG_MAX_PAGES, ARG_PAGE_SIZE,
    ARG_RETRY_BACKOFF_MS, ARG_START_DATE_TIME, CliError, DEFAULT_COUNTRY_CODE,
    DEFAULT_CURSOR_DIR, DEFAULT_DATABASE, ENV_INGEST_API_KEY, ENV_INGEST_GENRE,
};

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "ingest",
    long_about = "Fetch the page of Ticketmaster events the genre's cursor \
                 points at, store new artists and events in SQLite, then \
                 advance the cursor. Values can come from CLI flags, \
                 configuration files, or environment variables.",
    about = "Ingest the next page of events for a genre"
)]
#[ortho_config(prefix = "GIGLINE")]
pub(crate) struct IngestArgs {
    /// Genre keyword to search for. Also scopes the pagination cursor.
    #[arg(long = ARG_GENRE, value_name = "genre")]
    #[serde(default)]
    pub(crate) genre: Option<String>,
    /// Ticketmaster Discovery API key.
    #[arg(long = ARG_API_KEY, value_name = "key")]
    #[serde(default)]
    pub(crate) api_key: Option<String>,
    /// SQLite database file (default `ticketmaster_data.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Directory holding cursor files (default `.`).
    #[arg(long = ARG_CURSOR_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) cursor_dir: Option<Utf8PathBuf>,
    /// Override the API base URL.
    #[arg(long = ARG_BASE_URL, value_name = "url")]
    #[serde(default)]
    pub(crate) base_url: Option<String>,
    /// Country filter (default `US`).
    #[arg(long = ARG_COUNTRY_CODE, value_name = "code")]
    #[serde(default)]
    pub(crate) country_code: Option<String>,
    /// Earliest event start, e.g. `2025-01-01T00:00:00Z`.
    #[arg(long = ARG_START_DATE_TIME, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) start_date_time: Option<String>,
    /// Latest event start.
    #[arg(long = ARG_END_DATE_TIME, value_name = "timestamp")]
    #[serde(default)]
    pub(crate) end_date_time: Option<String>,
    /// Events requested per page (1 to 200, default 25).
    #[arg(long = ARG_PAGE_SIZE, value_name = "n")]
    #[serde(default)]
    pub(crate) page_size: Option<u32>,
    /// Pages to process in this run (default 1).
    #[arg(long = ARG_MAX_PAGES, value_name = "n")]
    #[serde(default)]
    pub(crate) max_pages: Option<u32>,
    /// Fetch attempts per page (default 1).
    #[arg(long = ARG_MAX_ATTEMPTS, value_name = "n")]
    #[serde(default)]
    pub(crate) max_attempts: Option<u32>,
    /// Base delay between fetch attempts in milliseconds (default 1000).
    #[arg(long = ARG_RETRY_BACKOFF_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) retry_backoff_ms: Option<u64>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    /// Query sent to the API; its keyword is the genre.
    pub(crate) query: EventQuery,
    /// API key passed as the `apikey` query parameter.
    pub(crate) api_key: String,
    /// API base URL.
    pub(crate) base_url: String,
    /// SQLite database file.
    pub(crate) database: Utf8PathBuf,
    /// Directory holding cursor files.
    pub(crate) cursor_dir: Utf8PathBuf,
    /// Page count and retry behaviour.
    pub(crate) policy: RunPolicy,
}

impl fmt::Debug for IngestConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestConfig")
            .field("query", &self.query)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("database", &self.database)
            .field("cursor_dir", &self.cursor_dir)
            .field("policy", &self.policy)
            .finish()
    }
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let genre = args.genre.ok_or(CliError::MissingArgument {
            field: ARG_GENRE,
            env: ENV_INGEST_GENRE,
        })?;
        CursorKey::new(&genre).map_err(CliError::InvalidGenre)?;
        let api_key = args.api_key.ok_or(CliError::MissingArgument {
            field: ARG_API_KEY,
            env: ENV_INGEST_API_KEY,
        })?;

        let page_size = args.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            return Err(CliError::InvalidPageSize {
                value: page_size,
                max: MAX_PAGE_SIZE,
            });
        }
        let country_code = args
            .country_code
            .unwrap_or_else(|| DEFAULT_COUNTRY_CODE.to_owned());
        let query = EventQuery::new(genre)
            .with_country_code(country_code)
            .with_date_range(args.start_date_time, args.end_date_time)
            .with_page_size(page_size);

        let defaults = RunPolicy::default();
        let policy = RunPolicy {
            max_pages: args.max_pages.unwrap_or(defaults.max_pages),
            max_attempts: args.max_attempts.unwrap_or(defaults.max_attempts),
            retry_backoff: args
                .retry_backoff_ms
                .map_or(defaults.retry_backoff, Duration::from_millis),
        };

        Ok(Self {
            query,
            api_key,
            base_url: args
                .base_url
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            cursor_dir: args
                .cursor_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_CURSOR_DIR)),
            policy,
        })
    }
}

/// Builds the event source for the current ingest invocation.
pub(crate) trait EventSourceBuilder {
    fn build(&self, config: &IngestConfig) -> Result<Box<dyn EventSource>, CliError>;
}

pub(crate) struct DefaultEventSourceBuilder;

impl EventSourceBuilder for DefaultEventSourceBuilder {
    fn build(&self, config: &IngestConfig) -> Result<Box<dyn EventSource>, CliError> {
        let source_config =
            HttpEventSourceConfig::new(config.api_key.clone()).with_base_url(config.base_url.clone());
        let client = HttpEventSource::with_config(source_config).map_err(|source| {
            CliError::BuildEventSource {
                base_url: config.base_url.clone(),
                source,
            }
        })?;
        Ok(Box::new(client))
    }
}

pub(crate) fn run_ingest_with(
    args: IngestArgs,
    builder: &dyn EventSourceBuilder,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let config = args.into_config()?;
    debug!("resolved ingest configuration: {config:?}");
    let report = execute_ingest(&config, builder)?;
    write_run_report(writer, config.query.genre(), &report)
}

pub(crate) fn execute_ingest(
    config: &IngestConfig,
    builder: &dyn EventSourceBuilder,
) -> Result<RunReport, CliError> {
    let events = builder.build(config)?;
    let database =
        EventDatabase::open(&config.database).map_err(|source| CliError::OpenDatabase {
            path: config.database.clone(),
            source,
        })?;
    let cursors = FileCursorStore::new(&config.cursor_dir);
    let mut pipeline = Pipeline::new(events.as_ref(), cursors, database).with_policy(config.policy);
    pipeline.run(&config.query).map_err(CliError::Ingest)
}

fn write_run_report(writer: &mut dyn Write, genre: &str, report: &RunReport) -> Result<(), CliError> {
    for page in &report.pages {
        writeln!(writer, "{}", describe_page(genre, page)).map_err(CliError::WriteOutput)?;
    }
    if report.exhausted {
        writeln!(writer, "{genre}: no more events to ingest").map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

/// One output line per ingested page.
pub(crate) fn describe_page(genre: &str, page: &PageSummary) -> String {
    format!(
        "{genre} page {}: {} fetched, {} skipped, {} new events ({} already stored), {} new artists; next page {}",
        page.page_index,
        page.fetched,
        page.skipped,
        page.batch.events_inserted,
        page.batch.events_ignored,
        page.batch.artists_inserted,
        page.next_page,
    )
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<IngestConfig, CliError> {
    let merged = IngestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    IngestConfig::try_from(merged)
}
