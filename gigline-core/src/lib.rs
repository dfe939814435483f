//! Core domain types for the gigline ingestion pipeline.
//!
//! The pipeline pages through an external event catalogue, normalises each
//! raw record into an [`Artist`] and the [`Event`] that references it, and
//! hands the pairs to a store. This crate holds the pieces that do not touch
//! the network or the database: the raw record shapes, the normaliser, the
//! [`EventSource`] and [`CursorStore`] seams, price [`Tier`]s and the report
//! row types. Adapters live in `gigline-data`.

#![forbid(unsafe_code)]

pub mod cursor;
pub mod entity;
pub mod normalise;
pub mod raw;
pub mod report;
pub mod source;
pub mod tier;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

pub use cursor::{CursorError, CursorKey, CursorKeyError, CursorStore};
pub use entity::{Artist, ArtistId, Event, NormalisedRecord, PriceRange, UNKNOWN};
pub use normalise::{NormalisedPage, SkipReason, normalise, normalise_page};
pub use raw::RawEvent;
pub use report::{ArtistSummary, CityTierCount, GenrePrice, Report};
pub use source::{
    DEFAULT_PAGE_SIZE, EventQuery, EventSource, FetchError, MAX_PAGE_SIZE, Page, PageRequest,
};
pub use tier::{Tier, UnknownTier};
