//! Event source trait and the query/page types it exchanges.

use crate::cursor::{CursorKey, CursorKeyError};
use crate::raw::RawEvent;

use super::error::FetchError;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

/// Largest page size the Discovery API accepts.
pub const MAX_PAGE_SIZE: u32 = 200;

/// Query context shared by every page of a run.
///
/// The keyword doubles as the genre assigned to artists first seen under this
/// query and as the scope of the pagination cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    /// Search keyword, typically a genre such as `Rock`.
    pub keyword: String,
    /// ISO 3166 country filter.
    pub country_code: Option<String>,
    /// Inclusive lower bound, as an ISO-8601 timestamp.
    pub start_date_time: Option<String>,
    /// Inclusive upper bound, as an ISO-8601 timestamp.
    pub end_date_time: Option<String>,
    /// Records requested per page.
    pub page_size: u32,
}

impl EventQuery {
    /// Create a query for `keyword` with the default page size and no filters.
    #[must_use]
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            country_code: None,
            start_date_time: None,
            end_date_time: None,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Restrict results to one country.
    #[must_use]
    pub fn with_country_code(mut self, code: impl Into<String>) -> Self {
        self.country_code = Some(code.into());
        self
    }

    /// Restrict results to a date window. Either bound may be omitted.
    #[must_use]
    pub fn with_date_range(mut self, start: Option<String>, end: Option<String>) -> Self {
        self.start_date_time = start;
        self.end_date_time = end;
        self
    }

    /// Set the page size.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Genre recorded against artists first seen under this query.
    #[must_use]
    pub fn genre(&self) -> &str {
        self.keyword.trim()
    }

    /// Cursor scope for this query.
    ///
    /// # Errors
    ///
    /// Returns [`CursorKeyError::Empty`] when the keyword is blank.
    pub fn cursor_key(&self) -> Result<CursorKey, CursorKeyError> {
        CursorKey::new(&self.keyword)
    }

    /// Build the request for page `page_index`.
    #[must_use]
    pub const fn page(&self, page_index: u32) -> PageRequest<'_> {
        PageRequest {
            query: self,
            page_index,
        }
    }
}

/// A request for one page of a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest<'a> {
    /// Query context.
    pub query: &'a EventQuery,
    /// Zero-based page index, taken from the cursor.
    pub page_index: u32,
}

impl PageRequest<'_> {
    /// Check the request can be sent upstream.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::InvalidRequest`] for a blank keyword or a page
    /// size outside `1..=MAX_PAGE_SIZE`.
    pub fn validate(&self) -> Result<(), FetchError> {
        if self.query.genre().is_empty() {
            return Err(FetchError::InvalidRequest {
                message: "keyword must not be empty".to_owned(),
            });
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.query.page_size) {
            return Err(FetchError::InvalidRequest {
                message: format!(
                    "page size {} is outside 1..={MAX_PAGE_SIZE}",
                    self.query.page_size
                ),
            });
        }
        Ok(())
    }
}

/// One page of raw events.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    /// Raw records in upstream order.
    pub events: Vec<RawEvent>,
    /// Total matches reported by the service across all pages.
    pub total_count: u64,
}

impl Page {
    /// An empty page with no reported matches.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            events: Vec::new(),
            total_count: 0,
        }
    }

    /// Whether this page signals the end of the available data.
    #[must_use]
    pub fn is_end_of_data(&self) -> bool {
        self.events.is_empty()
    }
}

/// Fetch pages of raw events for a query.
///
/// Implementations perform no retries of their own and must not interpret
/// the page contents beyond decoding them.
///
/// # Examples
///
/// ```
/// use gigline_core::{EventQuery, EventSource, FetchError, Page, PageRequest};
///
/// struct Exhausted;
///
/// impl EventSource for Exhausted {
///     fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
///         request.validate()?;
///         Ok(Page::empty())
///     }
/// }
///
/// let query = EventQuery::new("Rock");
/// let page = Exhausted.fetch_page(&query.page(0))?;
/// assert!(page.is_end_of_data());
/// # Ok::<(), FetchError>(())
/// ```
pub trait EventSource {
    /// Fetch the page described by `request`.
    ///
    /// An empty page is a successful response meaning no further data.
    fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError>;
}

impl<S: EventSource + ?Sized> EventSource for &S {
    fn fetch_page(&self, request: &PageRequest<'_>) -> Result<Page, FetchError> {
        (**self).fetch_page(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn query_builders_set_filters() {
        let query = EventQuery::new(" Jazz ")
            .with_country_code("US")
            .with_date_range(Some("2024-01-01T00:00:00Z".into()), None)
            .with_page_size(50);

        assert_eq!(query.genre(), "Jazz");
        assert_eq!(query.country_code.as_deref(), Some("US"));
        assert_eq!(query.start_date_time.as_deref(), Some("2024-01-01T00:00:00Z"));
        assert!(query.end_date_time.is_none());
        assert_eq!(query.page(3).page_index, 3);
        assert_eq!(query.cursor_key().expect("key").as_str(), "Jazz");
    }

    #[rstest]
    #[case(0)]
    #[case(MAX_PAGE_SIZE + 1)]
    fn validate_rejects_out_of_range_page_size(#[case] size: u32) {
        let query = EventQuery::new("Rock").with_page_size(size);
        let err = query.page(0).validate().expect_err("invalid size");
        assert!(matches!(err, FetchError::InvalidRequest { .. }));
    }

    #[rstest]
    fn validate_rejects_blank_keyword() {
        let query = EventQuery::new("   ");
        assert!(query.page(0).validate().is_err());
    }

    #[rstest]
    fn empty_page_marks_end_of_data() {
        assert!(Page::empty().is_end_of_data());
        let page = Page {
            events: vec![RawEvent::default()],
            total_count: 1,
        };
        assert!(!page.is_end_of_data());
    }
}
