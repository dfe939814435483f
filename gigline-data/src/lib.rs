//! Adapters for the gigline ingestion pipeline.
//!
//! Responsibilities:
//! - Fetch event pages from the Ticketmaster Discovery API.
//! - Persist pagination cursors on disk.
//! - Store artists and events in SQLite and aggregate them into reports.
//! - Orchestrate one ingestion run and render reports as text and SVG charts.
//!
//! Boundaries:
//! - Do not encode normalisation rules (live in `gigline-core`).
//! - Keep every adapter behind the narrow traits `gigline-core` defines.
//!
//! Invariants:
//! - A cursor advances only after the page it covers has been committed.
//! - No global mutable state.

pub mod cursor;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod ticketmaster;

pub use cursor::FileCursorStore;
pub use pipeline::{PageSummary, Pipeline, PipelineError, RunOutcome, RunPolicy, RunReport};
pub use report::{ChartReportRenderer, RenderError, ReportRenderer, TextReportRenderer};
pub use store::{BatchSummary, EventDatabase, InsertOutcome, PersistError, StoreError};
pub use ticketmaster::{HttpEventSource, HttpEventSourceConfig, SourceBuildError};
