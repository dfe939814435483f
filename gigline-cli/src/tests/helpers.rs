//! Test helpers: a temporary workspace and a stubbed event source builder.

use super::*;
use crate::ingest::{EventSourceBuilder, IngestArgs, IngestConfig};
use camino::{Utf8Path, Utf8PathBuf};
use gigline_core::test_support::{StubEventSource, page_of, sample_event, unpriced_event};
use gigline_core::{EventSource, FetchError, Page};
use tempfile::TempDir;

pub(super) const API_KEY: &str = "test-key";

/// Temporary directory holding the database, cursors and reports.
#[derive(Debug)]
pub(super) struct Workspace {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl Workspace {
    pub(super) fn new() -> Self {
        let dir = TempDir::new().expect("tempdir");
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 workspace");
        Self { _dir: dir, root }
    }

    pub(super) fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub(super) fn database(&self) -> Utf8PathBuf {
        self.root.join("events.db")
    }

    pub(super) fn cursor_dir(&self) -> Utf8PathBuf {
        self.root.join("cursors")
    }

    pub(super) fn output_dir(&self) -> Utf8PathBuf {
        self.root.join("reports")
    }

    pub(super) fn ingest_args(&self, genre: &str) -> IngestArgs {
        IngestArgs {
            genre: Some(genre.to_owned()),
            api_key: Some(API_KEY.to_owned()),
            database: Some(self.database()),
            cursor_dir: Some(self.cursor_dir()),
            ..IngestArgs::default()
        }
    }
}

pub(super) fn write_utf8(path: &Utf8Path, contents: &[u8]) {
    gigline_fs::write_atomic(path, contents).expect("write file");
}

/// Two priced events by different artists plus one without prices.
pub(super) fn mixed_page() -> Page {
    page_of(vec![
        sample_event("Opening Night", "The Band", "Austin", 60.0, 100.0),
        sample_event("Second Night", "Other Act", "Boston", 20.0, 40.0),
        unpriced_event("Mystery Gig", "Nobody"),
    ])
}

/// Hands out a fresh [`StubEventSource`] on every build.
#[derive(Debug, Default)]
pub(super) struct StubSourceBuilder {
    pages: Vec<Page>,
    error: Option<FetchError>,
}

impl StubSourceBuilder {
    pub(super) fn with_pages(pages: Vec<Page>) -> Self {
        Self {
            pages,
            error: None,
        }
    }

    pub(super) fn failing(error: FetchError) -> Self {
        Self {
            pages: Vec::new(),
            error: Some(error),
        }
    }
}

impl EventSourceBuilder for StubSourceBuilder {
    fn build(&self, _config: &IngestConfig) -> Result<Box<dyn EventSource>, CliError> {
        let source = match &self.error {
            Some(error) => StubEventSource::with_error(error.clone()),
            None => StubEventSource::with_pages(self.pages.clone()),
        };
        Ok(Box::new(source))
    }
}
