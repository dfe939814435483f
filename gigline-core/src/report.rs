//! Aggregate report rows.
//!
//! The store computes these rows with SQL joins and groupings; they carry no
//! ordering guarantee until [`Report::sorted`] is applied.

use crate::tier::Tier;

/// Average ticket price midpoint for one genre.
#[derive(Debug, Clone, PartialEq)]
pub struct GenrePrice {
    /// Artist genre.
    pub genre: String,
    /// Mean of `(min + max) / 2` over priced artists in the genre.
    pub average_price: f64,
}

/// Number of events in one city whose headliner falls in a price tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CityTierCount {
    /// Event city.
    pub city: String,
    /// Tier of the headliner's minimum price.
    pub tier: Tier,
    /// Events counted in this bucket.
    pub event_count: u64,
}

/// Event count and average event price for one artist.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtistSummary {
    /// Artist name.
    pub artist: String,
    /// Events referencing the artist.
    pub event_count: u64,
    /// Mean event price midpoint, absent when no event carries prices.
    pub average_price: Option<f64>,
}

impl ArtistSummary {
    /// Tier of the average event price.
    #[must_use]
    pub fn tier(&self) -> Option<Tier> {
        self.average_price.map(Tier::classify)
    }
}

/// The three aggregate views produced after ingestion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    /// Average price per genre.
    pub genre_prices: Vec<GenrePrice>,
    /// Event counts per city and tier.
    pub city_tiers: Vec<CityTierCount>,
    /// Per-artist summaries.
    pub artists: Vec<ArtistSummary>,
}

impl Report {
    /// Whether every section is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genre_prices.is_empty() && self.city_tiers.is_empty() && self.artists.is_empty()
    }

    /// Order rows by genre, by city then tier, and by artist name.
    #[must_use]
    pub fn sorted(mut self) -> Self {
        self.genre_prices.sort_by(|a, b| a.genre.cmp(&b.genre));
        self.city_tiers
            .sort_by(|a, b| a.city.cmp(&b.city).then(a.tier.cmp(&b.tier)));
        self.artists.sort_by(|a, b| a.artist.cmp(&b.artist));
        self
    }
}
