//! Unit tests for the report command.

use super::helpers::{StubSourceBuilder, Workspace, mixed_page, write_utf8};
use super::*;
use crate::ingest::{IngestConfig, execute_ingest};
use crate::report::{ReportArgs, ReportConfig, execute_report, run_report_with};
use camino::Utf8PathBuf;
use gigline_data::report::{
    ARTIST_SUMMARY_FILE, DISTRIBUTION_CHART_FILE, DISTRIBUTION_FILE, GENRE_PRICE_CHART_FILE,
    GENRE_PRICES_FILE,
};
use gigline_data::store::EventDatabase;
use rstest::rstest;

fn config_for(workspace: &Workspace) -> ReportConfig {
    ReportConfig {
        database: workspace.database(),
        output_dir: workspace.output_dir(),
    }
}

fn ingest_mixed_page(workspace: &Workspace) {
    let config = IngestConfig::try_from(workspace.ingest_args("Rock")).expect("config");
    execute_ingest(&config, &StubSourceBuilder::with_pages(vec![mixed_page()])).expect("ingest");
}

#[rstest]
fn conversion_applies_defaults() {
    let config = ReportConfig::from(ReportArgs::default());
    assert_eq!(config.database, Utf8PathBuf::from(DEFAULT_DATABASE));
    assert_eq!(config.output_dir, Utf8PathBuf::from(DEFAULT_OUTPUT_DIR));
}

#[rstest]
fn missing_database_is_reported() {
    let workspace = Workspace::new();

    let err = execute_report(&config_for(&workspace)).expect_err("database is missing");

    match err {
        CliError::MissingSourceFile { field, path } => {
            assert_eq!(field, ARG_DATABASE);
            assert_eq!(path, workspace.database());
        }
        other => panic!("expected MissingSourceFile, found {other:?}"),
    }
    assert!(!workspace.database().exists());
}

#[rstest]
fn directory_database_is_rejected() {
    let workspace = Workspace::new();
    let config = ReportConfig {
        database: workspace.root().to_path_buf(),
        output_dir: workspace.output_dir(),
    };

    let err = execute_report(&config).expect_err("directory is not a database");

    assert!(
        matches!(err, CliError::SourcePathNotFile { field, .. } if field == ARG_DATABASE),
        "found {err:?}"
    );
}

#[rstest]
fn corrupt_database_fails_to_open() {
    let workspace = Workspace::new();
    write_utf8(&workspace.database(), b"this is not sqlite");

    let err = execute_report(&config_for(&workspace)).expect_err("corrupt database");

    assert!(
        matches!(err, CliError::OpenDatabase { .. }),
        "found {err:?}"
    );
}

#[rstest]
fn report_renders_every_section_after_ingest() {
    let workspace = Workspace::new();
    ingest_mixed_page(&workspace);

    let written = execute_report(&config_for(&workspace)).expect("report");

    let names: Vec<&str> = written.iter().filter_map(|path| path.file_name()).collect();
    assert_eq!(
        names,
        vec![
            GENRE_PRICES_FILE,
            DISTRIBUTION_FILE,
            ARTIST_SUMMARY_FILE,
            GENRE_PRICE_CHART_FILE,
            DISTRIBUTION_CHART_FILE,
        ]
    );
    let prices = gigline_fs::read_to_string(&workspace.output_dir().join(GENRE_PRICES_FILE))
        .expect("read prices");
    assert_eq!(prices, "Average Ticket Prices by Genre:\nRock: $55.00\n");
}

#[rstest]
fn report_draws_charts_next_to_text_files() {
    let workspace = Workspace::new();
    ingest_mixed_page(&workspace);

    execute_report(&config_for(&workspace)).expect("report");

    for name in [GENRE_PRICE_CHART_FILE, DISTRIBUTION_CHART_FILE] {
        let chart = gigline_fs::read_to_string(&workspace.output_dir().join(name))
            .unwrap_or_else(|err| panic!("read {name}: {err}"));
        assert!(chart.contains("<svg"), "{name} is not an SVG document");
    }
    let prices = gigline_fs::read_to_string(&workspace.output_dir().join(GENRE_PRICE_CHART_FILE))
        .expect("read price chart");
    assert!(prices.contains("Rock"), "price chart lacks the genre label");
}

#[rstest]
fn run_report_lists_written_files() {
    let workspace = Workspace::new();
    ingest_mixed_page(&workspace);
    let args = ReportArgs {
        database: Some(workspace.database()),
        output_dir: Some(workspace.output_dir()),
    };
    let mut stdout = Vec::new();

    run_report_with(args, &mut stdout).expect("report");

    let output = String::from_utf8(stdout).expect("utf-8 output");
    assert_eq!(output.lines().count(), 5);
    assert!(output.lines().all(|line| line.starts_with("wrote ")));
}

#[rstest]
fn empty_database_reports_nothing() {
    let workspace = Workspace::new();
    drop(EventDatabase::open(&workspace.database()).expect("create database"));
    let args = ReportArgs {
        database: Some(workspace.database()),
        output_dir: Some(workspace.output_dir()),
    };
    let mut stdout = Vec::new();

    run_report_with(args, &mut stdout).expect("report");

    let output = String::from_utf8(stdout).expect("utf-8 output");
    assert!(output.contains("nothing to report"), "output was {output:?}");
    assert!(!workspace.output_dir().exists());
}
