//! Behavioural tests for end-to-end ingestion runs.
//!
//! Runs use a stub event source with an on-disk database and file-backed
//! cursors, so each scenario exercises the real persistence path.

use std::cell::RefCell;

use camino::Utf8PathBuf;
use gigline_core::test_support::{StubEventSource, page_of, sample_event, unpriced_event};
use gigline_core::{CursorKey, CursorStore, EventQuery, FetchError};
use gigline_data::cursor::FileCursorStore;
use gigline_data::pipeline::{Pipeline, PipelineError, RunOutcome};
use gigline_data::store::EventDatabase;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use tempfile::TempDir;

const GENRE: &str = "Rock";

#[derive(Default)]
struct IngestWorld {
    workspace: RefCell<Option<(TempDir, Utf8PathBuf)>>,
    source: RefCell<Option<StubEventSource>>,
    last: RefCell<Option<Result<RunOutcome, PipelineError>>>,
}

impl IngestWorld {
    fn root(&self) -> Utf8PathBuf {
        self.workspace
            .borrow()
            .as_ref()
            .map(|(_, root)| root.clone())
            .expect("workspace should be initialised")
    }

    fn database_path(&self) -> Utf8PathBuf {
        self.root().join("events.db")
    }

    fn cursors(&self) -> FileCursorStore {
        FileCursorStore::new(self.root().join("cursors"))
    }
}

#[fixture]
fn world() -> IngestWorld {
    IngestWorld::default()
}

fn key() -> CursorKey {
    CursorKey::new(GENRE).expect("valid key")
}

#[given("a fresh database and cursor directory")]
fn fresh_workspace(world: &IngestWorld) {
    let temp = TempDir::new().expect("create temp dir");
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 temp dir");
    world.workspace.replace(Some((temp, root)));
}

#[given("a source serving one page of two priced events")]
fn two_event_source(world: &IngestWorld) {
    world.source.replace(Some(StubEventSource::with_pages([page_of(vec![
        sample_event("Opening Night", "The Band", "Austin", 60.0, 100.0),
        sample_event("Closing Night", "Support", "Boston", 20.0, 40.0),
    ])])));
}

#[given("a source serving a page with one unpriced event among two priced events")]
fn mixed_source(world: &IngestWorld) {
    world.source.replace(Some(StubEventSource::with_pages([page_of(vec![
        sample_event("Opening Night", "The Band", "Austin", 60.0, 100.0),
        unpriced_event("Open Rehearsal", "Nobody"),
        sample_event("Closing Night", "Support", "Boston", 20.0, 40.0),
    ])])));
}

#[given("a source that fails with a network error")]
fn failing_source(world: &IngestWorld) {
    world
        .source
        .replace(Some(StubEventSource::with_error(FetchError::Network {
            url: "https://tm.example.com/discovery/v2/events.json".into(),
            message: "connection refused".into(),
        })));
}

#[given("a corrupt cursor file")]
fn corrupt_cursor(world: &IngestWorld) {
    let path = world.cursors().path_for(&key());
    gigline_fs::write_atomic(&path, b"page seven").expect("write corrupt cursor");
}

#[when("the pipeline runs once")]
fn run_once(world: &IngestWorld) {
    let guard = world.source.borrow();
    let source = guard.as_ref().expect("source should be configured");
    let database = EventDatabase::open(&world.database_path()).expect("open database");
    let mut pipeline = Pipeline::new(source, world.cursors(), database);
    let outcome = pipeline.run_once(&EventQuery::new(GENRE));
    world.last.replace(Some(outcome));
}

#[when("the cursor is rewound to the first page")]
fn reset_cursor(world: &IngestWorld) {
    world.cursors().reset(&key()).expect("reset cursor");
}

#[then("the cursor is {page}")]
fn cursor_is(world: &IngestWorld, page: u32) {
    assert_eq!(world.cursors().load(&key()), page);
}

#[then("{artists} artists and {events} events are stored")]
fn rows_stored(world: &IngestWorld, artists: u64, events: u64) {
    let database = EventDatabase::open(&world.database_path()).expect("open database");
    assert_eq!(database.artist_count().expect("count artists"), artists);
    assert_eq!(database.event_count().expect("count events"), events);
}

#[then("the last run reports exhaustion")]
fn last_run_exhausted(world: &IngestWorld) {
    let last = world.last.borrow();
    assert!(
        matches!(&*last, Some(Ok(RunOutcome::Exhausted { page_index: 1 }))),
        "expected exhaustion at page 1, got {last:?}"
    );
}

#[then("the last run failed to fetch")]
fn last_run_failed(world: &IngestWorld) {
    let last = world.last.borrow();
    assert!(
        matches!(&*last, Some(Err(PipelineError::Fetch { .. }))),
        "expected a fetch failure, got {last:?}"
    );
}

#[then("page {page} was requested")]
fn page_requested(world: &IngestWorld, page: u32) {
    let guard = world.source.borrow();
    let source = guard.as_ref().expect("source should be configured");
    assert_eq!(source.requested_pages(), vec![page]);
}

#[scenario(path = "tests/features/ingest.feature", index = 0)]
fn first_run_advances_cursor(world: IngestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ingest.feature", index = 1)]
fn empty_page_changes_nothing(world: IngestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ingest.feature", index = 2)]
fn failed_fetch_keeps_cursor(world: IngestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ingest.feature", index = 3)]
fn reingest_is_idempotent(world: IngestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ingest.feature", index = 4)]
fn corrupt_cursor_restarts(world: IngestWorld) {
    let _ = world;
}

#[scenario(path = "tests/features/ingest.feature", index = 5)]
fn unpriced_record_is_skipped(world: IngestWorld) {
    let _ = world;
}
