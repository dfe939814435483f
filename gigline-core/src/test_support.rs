//! Test-only, in-memory collaborators used by unit and behaviour tests.
//!
//! [`StubEventSource`] serves pre-built pages and [`MemoryCursorStore`]
//! records every cursor write so tests can assert monotonicity.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::cursor::{CursorError, CursorKey, CursorStore};
use crate::raw::{
    RawAttraction, RawCity, RawEvent, RawEventEmbedded, RawPriceRange, RawState, RawVenue,
};
use crate::source::{EventSource, FetchError, Page, PageRequest};

/// `EventSource` returning canned pages by index.
///
/// Indices past the configured pages return an empty page. Every request is
/// recorded, including failed ones.
#[derive(Debug, Default)]
pub struct StubEventSource {
    pages: Vec<Page>,
    error: Option<FetchError>,
    failures_left: Cell<usize>,
    requested: RefCell<Vec<u32>>,
}

impl StubEventSource {
    /// Serve `pages` in order, starting at page index zero.
    #[must_use]
    pub fn with_pages<I>(pages: I) -> Self
    where
        I: IntoIterator<Item = Page>,
    {
        Self {
            pages: pages.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Fail every request with `error`.
    #[must_use]
    pub fn with_error(error: FetchError) -> Self {
        Self {
            error: Some(error),
            failures_left: Cell::new(usize::MAX),
            ..Self::default()
        }
    }

    /// Fail the next `count` requests with `error`, then serve pages.
    #[must_use]
    pub fn with_transient_failures(mut self, count: usize, error: FetchError) -> Self {
        self.error = Some(error);
        self.failures_left = Cell::new(count);
        self
    }

    /// Page indices requested so far.
    #[must_use]
    pub fn requested_pages(&self) -> Vec<u32> {
        self.requested.borrow().clone()
    }
}

impl EventSource for StubEventSource {
    fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        self.requested.borrow_mut().push(request.page_index);
        request.validate()?;
        if let Some(error) = &self.error {
            let left = self.failures_left.get();
            if left > 0 {
                self.failures_left.set(left.saturating_sub(1));
                return Err(error.clone());
            }
        }
        let index = usize::try_from(request.page_index).unwrap_or(usize::MAX);
        Ok(self.pages.get(index).cloned().unwrap_or_default())
    }
}

/// In-memory `CursorStore` that records every save.
#[derive(Debug, Default)]
pub struct MemoryCursorStore {
    values: RefCell<HashMap<CursorKey, u32>>,
    saves: RefCell<Vec<(CursorKey, u32)>>,
    failing: bool,
}

impl MemoryCursorStore {
    /// Start with `page` stored under `key`.
    #[must_use]
    pub fn with_value(key: &CursorKey, page: u32) -> Self {
        let store = Self::default();
        store.values.borrow_mut().insert(key.clone(), page);
        store
    }

    /// A store whose writes always fail.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Stored value for `key`, if any.
    #[must_use]
    pub fn value(&self, key: &CursorKey) -> Option<u32> {
        self.values.borrow().get(key).copied()
    }

    /// Every successful save in call order.
    #[must_use]
    pub fn saved(&self) -> Vec<(CursorKey, u32)> {
        self.saves.borrow().clone()
    }
}

impl CursorStore for MemoryCursorStore {
    fn load(&self, key: &CursorKey) -> u32 {
        self.value(key).unwrap_or(0)
    }

    fn save(&self, key: &CursorKey, page: u32) -> Result<(), CursorError> {
        if self.failing {
            return Err(CursorError::Io {
                operation: "save",
                key: key.clone(),
                location: "memory".to_owned(),
                source: std::io::Error::other("cursor store configured to fail"),
            });
        }
        self.values.borrow_mut().insert(key.clone(), page);
        self.saves.borrow_mut().push((key.clone(), page));
        Ok(())
    }
}

/// Build a raw event with one price range, one headliner and one venue.
#[must_use]
pub fn sample_event(name: &str, artist: &str, city: &str, min: f64, max: f64) -> RawEvent {
    RawEvent {
        id: Some(format!("id-{name}")),
        name: Some(name.to_owned()),
        price_ranges: Some(vec![RawPriceRange {
            min: Some(min),
            max: Some(max),
            currency: Some("USD".to_owned()),
        }]),
        embedded: Some(RawEventEmbedded {
            attractions: Some(vec![RawAttraction {
                name: Some(artist.to_owned()),
            }]),
            venues: Some(vec![RawVenue {
                name: Some(format!("{city} Arena")),
                city: Some(RawCity {
                    name: Some(city.to_owned()),
                }),
                state: Some(RawState {
                    name: None,
                    state_code: Some("CA".to_owned()),
                }),
            }]),
        }),
    }
}

/// Build a raw event with no price data.
#[must_use]
pub fn unpriced_event(name: &str, artist: &str) -> RawEvent {
    RawEvent {
        price_ranges: None,
        ..sample_event(name, artist, "Nowhere", 0.0, 0.0)
    }
}

/// Wrap raw events in a page whose total equals their count.
#[must_use]
pub fn page_of(events: Vec<RawEvent>) -> Page {
    let total_count = u64::try_from(events.len()).unwrap_or(u64::MAX);
    Page {
        events,
        total_count,
    }
}
