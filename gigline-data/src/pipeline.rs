//! Run orchestration: fetch a page, normalise it, persist it, advance the cursor.
//!
//! A run loads the cursor for the query, fetches that page and, unless the
//! page is empty, writes it in one transaction before saving `loaded + 1`.
//! The cursor is never touched when the fetch or the write fails, so the next
//! run retries the same page. Writes are idempotent, which makes a crash
//! between commit and cursor save harmless.

use std::time::Duration;

use gigline_core::{
    CursorError, CursorKeyError, CursorStore, EventQuery, EventSource, FetchError, Page,
    normalise_page,
};
use log::{info, warn};
use thiserror::Error;

use crate::store::{BatchSummary, EventDatabase, PersistError};

/// Default pause before the first retry of a failed fetch.
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// How many pages a run may process and how fetch failures are retried.
///
/// The default processes a single page and never retries, leaving
/// repetition to whoever schedules the runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunPolicy {
    /// Upper bound on pages processed by [`Pipeline::run`]. Zero is treated as one.
    pub max_pages: u32,
    /// Fetch attempts per page. Zero is treated as one.
    pub max_attempts: u32,
    /// Base retry delay; attempt `n` waits `n` times this long.
    pub retry_backoff: Duration,
}

impl Default for RunPolicy {
    fn default() -> Self {
        Self {
            max_pages: 1,
            max_attempts: 1,
            retry_backoff: DEFAULT_RETRY_BACKOFF,
        }
    }
}

impl RunPolicy {
    /// Process up to `max_pages` pages per run.
    #[must_use]
    pub const fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Attempt each fetch up to `max_attempts` times.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the base retry delay.
    #[must_use]
    pub const fn with_retry_backoff(mut self, retry_backoff: Duration) -> Self {
        self.retry_backoff = retry_backoff;
        self
    }
}

/// What one processed page contributed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSummary {
    /// Page index that was fetched.
    pub page_index: u32,
    /// Raw records received.
    pub fetched: usize,
    /// Raw records dropped by the normaliser.
    pub skipped: usize,
    /// Row-level write outcome.
    pub batch: BatchSummary,
    /// Cursor value saved after the commit.
    pub next_page: u32,
    /// Total matches reported upstream.
    pub total_count: u64,
}

/// Terminal state of [`Pipeline::run_once`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The page came back empty; nothing was written and the cursor is unchanged.
    Exhausted {
        /// Page index that was requested.
        page_index: u32,
    },
    /// The page was written and the cursor advanced.
    Ingested(PageSummary),
}

/// Aggregate result of [`Pipeline::run`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Pages written, in order.
    pub pages: Vec<PageSummary>,
    /// Whether the run stopped on an empty page.
    pub exhausted: bool,
    /// Sum of every page's write outcome.
    pub totals: BatchSummary,
}

/// Errors that abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The query has no usable cursor key.
    #[error("invalid query")]
    InvalidQuery(#[source] CursorKeyError),
    /// Fetching the page failed on every attempt; the cursor is unchanged.
    #[error("failed to fetch page {page_index} after {attempts} attempt(s)")]
    Fetch {
        /// Page that was requested.
        page_index: u32,
        /// Attempts made.
        attempts: u32,
        /// Last fetch error.
        #[source]
        source: FetchError,
    },
    /// Writing the page failed and was rolled back; the cursor is unchanged.
    #[error("failed to persist page {page_index}")]
    Persist {
        /// Page being written.
        page_index: u32,
        /// Storage error.
        #[source]
        source: PersistError,
    },
    /// The page committed but the cursor could not be advanced.
    #[error("page {page_index} was stored but the cursor could not be advanced")]
    Cursor {
        /// Page that was written.
        page_index: u32,
        /// Cursor error.
        #[source]
        source: CursorError,
    },
}

/// Orchestrates one ingestion run over an event source, a cursor store and
/// the event database.
///
/// # Examples
/// ```
/// use gigline_core::test_support::{MemoryCursorStore, StubEventSource, page_of, sample_event};
/// use gigline_core::{CursorStore, EventQuery};
/// use gigline_data::pipeline::{Pipeline, RunOutcome};
/// use gigline_data::store::EventDatabase;
///
/// let source = StubEventSource::with_pages([page_of(vec![
///     sample_event("Opening Night", "The Band", "Austin", 60.0, 100.0),
/// ])]);
/// let cursors = MemoryCursorStore::default();
/// let mut pipeline = Pipeline::new(&source, &cursors, EventDatabase::open_in_memory()?);
/// let query = EventQuery::new("Rock");
///
/// assert!(matches!(pipeline.run_once(&query)?, RunOutcome::Ingested(_)));
/// assert!(matches!(pipeline.run_once(&query)?, RunOutcome::Exhausted { page_index: 1 }));
/// assert_eq!(cursors.load(&query.cursor_key()?), 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Pipeline<S, C> {
    source: S,
    cursors: C,
    database: EventDatabase,
    policy: RunPolicy,
}

impl<S: EventSource, C: CursorStore> Pipeline<S, C> {
    /// Assemble a pipeline with the default [`RunPolicy`].
    #[must_use]
    pub fn new(source: S, cursors: C, database: EventDatabase) -> Self {
        Self {
            source,
            cursors,
            database,
            policy: RunPolicy::default(),
        }
    }

    /// Replace the run policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RunPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active run policy.
    #[must_use]
    pub const fn policy(&self) -> RunPolicy {
        self.policy
    }

    /// Borrow the event database, for example to build a report.
    #[must_use]
    pub const fn database(&self) -> &EventDatabase {
        &self.database
    }

    /// Release the event database.
    #[must_use]
    pub fn into_database(self) -> EventDatabase {
        self.database
    }

    /// Process the page the cursor points at.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the query is invalid or a step fails.
    /// Fetch and persist failures leave the cursor untouched.
    pub fn run_once(&mut self, query: &EventQuery) -> Result<RunOutcome, PipelineError> {
        let key = query.cursor_key().map_err(PipelineError::InvalidQuery)?;
        let page_index = self.cursors.load(&key);
        info!("fetching page {page_index} of '{}'", query.genre());

        let page = self.fetch_with_retry(query, page_index)?;
        if page.is_end_of_data() {
            info!(
                "page {page_index} of '{}' is empty; no more events to ingest",
                query.genre()
            );
            return Ok(RunOutcome::Exhausted { page_index });
        }

        let normalised = normalise_page(&page.events, query.genre());
        let batch = self
            .database
            .persist_batch(&normalised.records)
            .map_err(|source| PipelineError::Persist { page_index, source })?;

        let next_page = page_index.saturating_add(1);
        self.cursors
            .save(&key, next_page)
            .map_err(|source| PipelineError::Cursor { page_index, source })?;

        let summary = PageSummary {
            page_index,
            fetched: page.events.len(),
            skipped: normalised.skipped,
            batch,
            next_page,
            total_count: page.total_count,
        };
        info!(
            "stored page {page_index} of '{}': {} fetched, {} skipped, {} new events; next page {next_page}",
            query.genre(),
            summary.fetched,
            summary.skipped,
            summary.batch.events_inserted,
        );
        Ok(RunOutcome::Ingested(summary))
    }

    /// Process up to `policy.max_pages` pages, stopping early on an empty page.
    ///
    /// # Errors
    ///
    /// Returns the first [`PipelineError`]. Pages committed before the
    /// failure stay committed and their cursor advances stay saved.
    pub fn run(&mut self, query: &EventQuery) -> Result<RunReport, PipelineError> {
        let mut report = RunReport::default();
        for _ in 0..self.policy.max_pages.max(1) {
            match self.run_once(query)? {
                RunOutcome::Exhausted { .. } => {
                    report.exhausted = true;
                    break;
                }
                RunOutcome::Ingested(summary) => {
                    report.totals = report.totals.combine(summary.batch);
                    report.pages.push(summary);
                }
            }
        }
        Ok(report)
    }

    fn fetch_with_retry(&self, query: &EventQuery, page_index: u32) -> Result<Page, PipelineError> {
        let request = query.page(page_index);
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 1;
        loop {
            match self.source.fetch_page(&request) {
                Ok(page) => return Ok(page),
                Err(source) if attempt >= max_attempts || !is_retryable(&source) => {
                    return Err(PipelineError::Fetch {
                        page_index,
                        attempts: attempt,
                        source,
                    });
                }
                Err(err) => {
                    let delay = self.policy.retry_backoff.saturating_mul(attempt);
                    warn!(
                        "attempt {attempt}/{max_attempts} for page {page_index} failed: {err}; retrying in {delay:?}"
                    );
                    std::thread::sleep(delay);
                    attempt += 1;
                }
            }
        }
    }
}

/// Request errors will fail identically on every attempt.
const fn is_retryable(error: &FetchError) -> bool {
    !matches!(error, FetchError::InvalidRequest { .. })
}
