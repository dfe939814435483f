//! Normalised entities persisted by the ingestion pipeline.
//!
//! An [`Event`] always references exactly one [`Artist`]. Both are keyed by
//! their name; the store resolves the numeric [`ArtistId`] when the pair is
//! written.

/// Placeholder used when the upstream record omits a descriptive field.
pub const UNKNOWN: &str = "Unknown";

/// A ticket price range with finite bounds.
///
/// # Examples
/// ```
/// use gigline_core::PriceRange;
///
/// let range = PriceRange::new(60.0, 100.0).expect("finite bounds");
/// assert_eq!(range.midpoint(), 80.0);
/// assert!(PriceRange::new(f64::NAN, 10.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// Lowest advertised price.
    pub min: f64,
    /// Highest advertised price.
    pub max: f64,
}

impl PriceRange {
    /// Construct a range when both bounds are finite.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Option<Self> {
        (min.is_finite() && max.is_finite()).then_some(Self { min, max })
    }

    /// Mean of the two bounds.
    #[must_use]
    #[expect(
        clippy::float_arithmetic,
        reason = "the midpoint metric is defined as (min + max) / 2"
    )]
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) / 2.0
    }
}

/// Performer referenced by one or more events.
///
/// The first insert of a given name wins; later records with the same name
/// never update `genre` or `price`.
#[derive(Debug, Clone, PartialEq)]
pub struct Artist {
    /// Natural key.
    pub name: String,
    /// Query category the artist was first seen under.
    pub genre: String,
    /// Price range observed on the first ingested event.
    pub price: Option<PriceRange>,
}

/// A single ticketed event.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Natural key.
    pub name: String,
    /// Venue city.
    pub city: String,
    /// Venue state or region code.
    pub state: String,
    /// Price range advertised for this event.
    pub price: Option<PriceRange>,
}

/// Row identifier of a persisted [`Artist`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArtistId(i64);

impl ArtistId {
    /// Wrap a raw SQLite row id.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Return the raw row id.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ArtistId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An artist and the event that references it, ready to persist.
///
/// The artist must be written before the event so the foreign key resolves.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalisedRecord {
    /// Referenced performer.
    pub artist: Artist,
    /// Event of interest.
    pub event: Event,
}
