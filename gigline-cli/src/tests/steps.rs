//! Behaviour-driven step definitions driving whole CLI invocations.

use super::helpers::{StubSourceBuilder, Workspace, mixed_page};
use super::*;
use gigline_core::{CursorKey, CursorStore};
use gigline_data::cursor::FileCursorStore;
use gigline_data::store::EventDatabase;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::RefCell;

/// Scenario state shared by every step through a single world argument.
#[derive(Debug)]
struct CliWorld {
    workspace: Workspace,
    builder: RefCell<StubSourceBuilder>,
    stdout: RefCell<Vec<u8>>,
    result: RefCell<Option<Result<(), CliError>>>,
}

impl CliWorld {
    fn new() -> Self {
        Self {
            workspace: Workspace::new(),
            builder: RefCell::new(StubSourceBuilder::default()),
            stdout: RefCell::new(Vec::new()),
            result: RefCell::new(None),
        }
    }

    /// Point every command at the scenario's temporary workspace.
    fn build_command_line(&self, command: &str) -> Vec<String> {
        let mut argv = vec!["gigline".to_owned()];
        argv.extend(command.split_whitespace().map(str::to_owned));
        let workspace_flags = match argv.get(1).map(String::as_str) {
            Some("ingest") => vec![
                (ARG_DATABASE, self.workspace.database()),
                (ARG_CURSOR_DIR, self.workspace.cursor_dir()),
            ],
            Some("report") => vec![
                (ARG_DATABASE, self.workspace.database()),
                (ARG_OUTPUT_DIR, self.workspace.output_dir()),
            ],
            Some("reset-cursor") => vec![(ARG_CURSOR_DIR, self.workspace.cursor_dir())],
            _ => Vec::new(),
        };
        for (flag, path) in workspace_flags {
            argv.push(format!("--{flag}"));
            argv.push(path.into_string());
        }
        argv
    }

    fn output(&self) -> String {
        String::from_utf8(self.stdout.borrow().clone()).expect("utf-8 output")
    }
}

#[fixture]
fn world() -> CliWorld {
    CliWorld::new()
}

#[given("the event source serves one page of events")]
fn source_serves_page(#[from(world)] world: &CliWorld) {
    world
        .builder
        .replace(StubSourceBuilder::with_pages(vec![mixed_page()]));
}

#[when("I run {command}")]
fn run_command(#[from(world)] world: &CliWorld, command: String) {
    let argv = world.build_command_line(command.trim_matches('"'));
    let builder = world.builder.borrow();
    let mut stdout = world.stdout.borrow_mut();
    let outcome = Cli::try_parse_from(argv)
        .map_err(CliError::ArgumentParsing)
        .and_then(|cli| dispatch_with(cli.command, &*builder, &mut *stdout));
    world.result.replace(Some(outcome));
}

#[then("the command succeeds")]
fn command_succeeds(#[from(world)] world: &CliWorld) {
    let borrowed = world.result.borrow();
    let outcome = borrowed.as_ref().expect("result recorded");
    if let Err(err) = outcome {
        panic!("expected success, found {err:?}");
    }
}

#[then("the output mentions {text}")]
fn output_mentions(#[from(world)] world: &CliWorld, text: String) {
    let expected = text.trim_matches('"');
    let output = world.output();
    assert!(
        output.contains(expected),
        "expected {expected:?} in output {output:?}"
    );
}

#[then("the database holds {count} events")]
fn database_holds(#[from(world)] world: &CliWorld, count: u64) {
    let database =
        EventDatabase::open_existing(&world.workspace.database()).expect("database exists");
    assert_eq!(database.event_count().expect("count events"), count);
}

#[then("the {genre} cursor points at page {page}")]
fn cursor_points_at(#[from(world)] world: &CliWorld, genre: String, page: u32) {
    let key = CursorKey::new(&genre).expect("cursor key");
    let cursors = FileCursorStore::new(world.workspace.cursor_dir());
    assert_eq!(cursors.load(&key), page);
}

#[then("the CLI reports that the {flag} flag is missing")]
fn reports_missing_flag(#[from(world)] world: &CliWorld, flag: String) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    match error {
        CliError::MissingArgument { field, .. } => assert_eq!(*field, flag.trim_matches('"')),
        other => panic!("unexpected error {other:?}"),
    }
}

#[then("the CLI reports an invalid page size")]
fn reports_invalid_page_size(#[from(world)] world: &CliWorld) {
    let borrowed = world.result.borrow();
    let error = borrowed
        .as_ref()
        .expect("result recorded")
        .as_ref()
        .expect_err("expected error");
    assert!(
        matches!(error, CliError::InvalidPageSize { value: 500, .. }),
        "unexpected error {error:?}"
    );
}

macro_rules! register_cli_scenario {
    ($fn_name:ident, $scenario_title:literal) => {
        #[scenario(path = "tests/features/cli_commands.feature", name = $scenario_title)]
        fn $fn_name(#[from(world)] world: CliWorld) {
            let _ = world;
        }
    };
}

register_cli_scenario!(ingest_first_page, "ingesting the first page for a genre");
register_cli_scenario!(rejecting_missing_api_key, "rejecting a missing API key");
register_cli_scenario!(reporting_after_ingest, "reporting on ingested events");
register_cli_scenario!(resetting_after_ingest, "resetting a cursor after ingestion");
register_cli_scenario!(rejecting_oversized_page, "rejecting an oversized page");
