//! Facade crate for the gigline ingestion pipeline.
//!
//! This crate re-exports the core domain types and exposes the SQLite store,
//! HTTP event source, run orchestrator and report renderers behind the `store-sqlite` feature.

#![forbid(unsafe_code)]

pub use gigline_core::{
    Artist, ArtistId, CursorError, CursorKey, CursorKeyError, CursorStore, Event, EventQuery,
    EventSource, FetchError, NormalisedRecord, Page, PageRequest, SkipReason, Tier, normalise,
    normalise_page,
};
pub use gigline_core::report::{ArtistSummary, CityTierCount, GenrePrice, Report};

#[cfg(feature = "store-sqlite")]
pub use gigline_data::{
    cursor::FileCursorStore,
    pipeline::{PageSummary, Pipeline, PipelineError, RunOutcome, RunPolicy, RunReport},
    report::{ChartReportRenderer, RenderError, ReportRenderer, TextReportRenderer},
    store::{BatchSummary, EventDatabase, PersistError, StoreError},
    ticketmaster::{HttpEventSource, HttpEventSourceConfig},
};
