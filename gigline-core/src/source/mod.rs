//! Retrieve pages of raw events from an external catalogue.
//!
//! The [`EventSource`] trait abstracts a paginated, quota-bound API. Callers
//! describe the query once with an [`EventQuery`] and ask for one page at a
//! time through a [`PageRequest`]. An empty [`Page`] marks the end of the
//! available data.

mod error;
mod provider;

pub use error::FetchError;
pub use provider::{DEFAULT_PAGE_SIZE, EventQuery, EventSource, MAX_PAGE_SIZE, Page, PageRequest};
