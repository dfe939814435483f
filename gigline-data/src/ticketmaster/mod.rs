//! Ticketmaster Discovery API event source.
//!
//! [`HttpEventSource`] implements [`gigline_core::EventSource`] against the
//! Discovery v2 `events.json` endpoint. The trait is synchronous, so the
//! source blocks on an internal Tokio runtime for each page.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use gigline_core::{EventQuery, EventSource};
//! use gigline_data::ticketmaster::{HttpEventSource, HttpEventSourceConfig};
//!
//! let config = HttpEventSourceConfig::new("my-api-key")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_user_agent("gigline-docs/1.0");
//! let source = HttpEventSource::with_config(config)?;
//!
//! let query = EventQuery::new("Rock").with_country_code("US");
//! let page = source.fetch_page(&query.page(0))?;
//! println!("{} of {} events", page.events.len(), page.total_count);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod client;
mod response;

pub use client::{
    DEFAULT_BASE_URL, DEFAULT_USER_AGENT, EVENTS_PATH, HttpEventSource, HttpEventSourceConfig,
    SourceBuildError,
};
pub use response::{EmbeddedEvents, EventsResponse, PageInfo};
