//! Discovery API response envelope for `events.json`.
//!
//! See: <https://developer.ticketmaster.com/products-and-docs/apis/discovery-api/v2/#search-events-v2>

use gigline_core::{Page, RawEvent};
use serde::Deserialize;

/// Top-level search response.
///
/// The `_embedded` object is absent when the query matches nothing or the
/// requested page is past the end of the results.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EventsResponse {
    /// Matched events for this page.
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedEvents>,
    /// Paging metadata.
    pub page: Option<PageInfo>,
}

/// Wrapper around the event list.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EmbeddedEvents {
    /// Raw event records.
    pub events: Vec<RawEvent>,
}

/// Paging metadata reported alongside the results.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PageInfo {
    /// Requested page size.
    pub size: u32,
    /// Total matching events across all pages.
    #[serde(rename = "totalElements")]
    pub total_elements: u64,
    /// Total pages at the requested size.
    #[serde(rename = "totalPages")]
    pub total_pages: u32,
    /// Zero-based index of this page.
    pub number: u32,
}

impl EventsResponse {
    /// Convert the envelope into a [`Page`].
    #[must_use]
    pub fn into_page(self) -> Page {
        Page {
            events: self.embedded.map(|embedded| embedded.events).unwrap_or_default(),
            total_count: self.page.map_or(0, |info| info.total_elements),
        }
    }
}
