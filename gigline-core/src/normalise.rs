//! Map raw API records to artist/event pairs.
//!
//! Normalisation is deterministic and side-effect free apart from logging.
//! A record without a usable price range is skipped; every other gap falls
//! back to [`UNKNOWN`]. One bad record never aborts the page.

use log::{debug, warn};
use thiserror::Error;

use crate::entity::{Artist, Event, NormalisedRecord, PriceRange, UNKNOWN};
use crate::raw::RawEvent;

/// Why a raw record was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SkipReason {
    /// The first price range lacks a minimum or maximum, or is absent.
    #[error("missing price data")]
    MissingPrice,
    /// A price bound is not a finite number.
    #[error("price bounds {min}..{max} are not finite")]
    InvalidPrice {
        /// Reported minimum.
        min: f64,
        /// Reported maximum.
        max: f64,
    },
}

/// Records that survived normalisation plus the number dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalisedPage {
    /// Valid artist/event pairs in upstream order.
    pub records: Vec<NormalisedRecord>,
    /// Count of skipped raw records.
    pub skipped: usize,
}

/// Normalise one raw record under the query `genre`.
///
/// # Examples
/// ```
/// use gigline_core::raw::{RawEvent, RawPriceRange};
/// use gigline_core::{SkipReason, normalise};
///
/// let raw = RawEvent {
///     name: Some("Late Show".into()),
///     price_ranges: Some(vec![RawPriceRange {
///         min: Some(40.0),
///         max: Some(80.0),
///         currency: None,
///     }]),
///     ..RawEvent::default()
/// };
/// let record = normalise(&raw, "Jazz").expect("priced record");
/// assert_eq!(record.artist.name, "Unknown");
/// assert_eq!(record.artist.genre, "Jazz");
/// assert_eq!(record.event.city, "Unknown");
///
/// let unpriced = RawEvent::default();
/// assert_eq!(normalise(&unpriced, "Jazz"), Err(SkipReason::MissingPrice));
/// ```
pub fn normalise(raw: &RawEvent, genre: &str) -> Result<NormalisedRecord, SkipReason> {
    let range = raw.first_price_range().ok_or(SkipReason::MissingPrice)?;
    let (Some(min), Some(max)) = (range.min, range.max) else {
        return Err(SkipReason::MissingPrice);
    };
    let price = PriceRange::new(min, max).ok_or(SkipReason::InvalidPrice { min, max })?;

    let venue = raw.venue();
    let city = venue
        .and_then(|entry| entry.city.as_ref())
        .and_then(|city| city.name.as_deref());
    let state = venue
        .and_then(|entry| entry.state.as_ref())
        .and_then(|state| state.state_code.as_deref());

    Ok(NormalisedRecord {
        artist: Artist {
            name: text_or_unknown(raw.headliner()),
            genre: genre.trim().to_owned(),
            price: Some(price),
        },
        event: Event {
            name: text_or_unknown(raw.name.as_deref()),
            city: text_or_unknown(city),
            state: text_or_unknown(state),
            price: Some(price),
        },
    })
}

/// Normalise a whole page, logging and counting skipped records.
pub fn normalise_page(events: &[RawEvent], genre: &str) -> NormalisedPage {
    let mut page = NormalisedPage::default();
    for raw in events {
        match normalise(raw, genre) {
            Ok(record) => {
                debug!(
                    "normalised event '{}' headlined by '{}'",
                    record.event.name, record.artist.name
                );
                page.records.push(record);
            }
            Err(reason) => {
                warn!(
                    "skipping event '{}' ({}): {reason}",
                    raw.name.as_deref().unwrap_or(UNKNOWN),
                    raw.id.as_deref().unwrap_or("no id"),
                );
                page.skipped += 1;
            }
        }
    }
    page
}

fn text_or_unknown(value: Option<&str>) -> String {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .unwrap_or(UNKNOWN)
        .to_owned()
}
