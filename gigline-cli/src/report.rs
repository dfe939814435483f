//! Report command implementation for the gigline CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use gigline_data::report::{ChartReportRenderer, ReportRenderer, TextReportRenderer};
use gigline_data::store::EventDatabase;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};

use crate::{ARG_DATABASE, ARG_OUTPUT_DIR, CliError, DEFAULT_DATABASE, DEFAULT_OUTPUT_DIR};

/// CLI arguments for the `report` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "report",
    long_about = "Run the genre price, city tier and artist aggregations over \
                 an existing event database and write one text file per \
                 non-empty section.",
    about = "Write text reports from stored events"
)]
#[ortho_config(prefix = "GIGLINE")]
pub(crate) struct ReportArgs {
    /// SQLite database file (default `ticketmaster_data.db`).
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Directory receiving the report files (default `.`).
    #[arg(long = ARG_OUTPUT_DIR, value_name = "dir")]
    #[serde(default)]
    pub(crate) output_dir: Option<Utf8PathBuf>,
}

impl ReportArgs {
    pub(crate) fn into_config(self) -> Result<ReportConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        Ok(ReportConfig::from(merged))
    }
}

/// Resolved `report` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportConfig {
    pub(crate) database: Utf8PathBuf,
    pub(crate) output_dir: Utf8PathBuf,
}

impl From<ReportArgs> for ReportConfig {
    fn from(args: ReportArgs) -> Self {
        Self {
            database: args
                .database
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE)),
            output_dir: args
                .output_dir
                .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_OUTPUT_DIR)),
        }
    }
}

impl ReportConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.database, ARG_DATABASE)
    }
}

fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match gigline_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) fn run_report_with(args: ReportArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    let written = execute_report(&config)?;
    if written.is_empty() {
        writeln!(writer, "no events stored in {}; nothing to report", config.database)
            .map_err(CliError::WriteOutput)?;
    }
    for path in &written {
        writeln!(writer, "wrote {path}").map_err(CliError::WriteOutput)?;
    }
    Ok(())
}

pub(crate) fn execute_report(config: &ReportConfig) -> Result<Vec<Utf8PathBuf>, CliError> {
    config.validate_sources()?;
    let database =
        EventDatabase::open_existing(&config.database).map_err(|source| CliError::OpenDatabase {
            path: config.database.clone(),
            source,
        })?;
    let report = database
        .build_report()
        .map_err(|source| CliError::Aggregate {
            path: config.database.clone(),
            source,
        })?;
    let mut written = TextReportRenderer::new(&config.output_dir).render(&report)?;
    written.extend(ChartReportRenderer::new(&config.output_dir).render(&report)?);
    Ok(written)
}
