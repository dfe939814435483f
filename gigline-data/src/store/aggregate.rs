//! Read-only report queries.
//!
//! None of these impose an ordering; callers wanting stable output apply
//! [`Report::sorted`].

use std::str::FromStr;

use gigline_core::{ArtistSummary, CityTierCount, GenrePrice, Report, Tier};
use rusqlite::types::Type;
use rusqlite::{Row, params};

use super::{EventDatabase, StoreError};

const AVERAGE_PRICE_BY_GENRE: &str = "SELECT genre, AVG((min_price + max_price) / 2.0)
    FROM artists
    WHERE min_price IS NOT NULL AND max_price IS NOT NULL
      AND min_price > 0 AND max_price > 0
    GROUP BY genre";

const TIER_DISTRIBUTION_BY_CITY: &str = "SELECT events.city,
        CASE
            WHEN artists.min_price < ?1 THEN ?3
            WHEN artists.min_price <= ?2 THEN ?4
            ELSE ?5
        END AS tier,
        COUNT(events.id)
    FROM events
    JOIN artists ON artists.id = events.artist_id
    WHERE events.city IS NOT NULL AND artists.min_price IS NOT NULL
    GROUP BY events.city, tier";

const ARTIST_SUMMARIES: &str = "SELECT artists.name,
        COUNT(events.id),
        AVG(CASE
            WHEN events.min_price IS NOT NULL AND events.max_price IS NOT NULL
            THEN (events.min_price + events.max_price) / 2.0
        END)
    FROM artists
    LEFT JOIN events ON events.artist_id = artists.id
    GROUP BY artists.id, artists.name";

impl EventDatabase {
    /// Average ticket price midpoint per artist genre.
    ///
    /// Artists without both prices, or with a non-positive price, are left
    /// out of the average.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the query fails.
    pub fn average_price_by_genre(&self) -> Result<Vec<GenrePrice>, StoreError> {
        let operation = "average prices by genre";
        let mut statement = self
            .connection
            .prepare_cached(AVERAGE_PRICE_BY_GENRE)
            .map_err(|source| StoreError::Query { operation, source })?;
        let rows = statement
            .query_map([], |row| {
                Ok(GenrePrice {
                    genre: row.get(0)?,
                    average_price: row.get(1)?,
                })
            })
            .map_err(|source| StoreError::Query { operation, source })?;
        rows.collect::<Result<_, _>>()
            .map_err(|source| StoreError::Query { operation, source })
    }

    /// Count events per city and the price tier of each event's artist.
    ///
    /// The tier is taken from the artist's minimum price using the
    /// [`Tier`] thresholds. Events without a city, or whose artist has no
    /// minimum price, are not counted.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the query fails or yields an
    /// unrecognised tier.
    pub fn tier_distribution_by_city(&self) -> Result<Vec<CityTierCount>, StoreError> {
        let operation = "count events by city and tier";
        let mut statement = self
            .connection
            .prepare_cached(TIER_DISTRIBUTION_BY_CITY)
            .map_err(|source| StoreError::Query { operation, source })?;
        let rows = statement
            .query_map(
                params![
                    Tier::MEDIUM_FLOOR,
                    Tier::MEDIUM_CEILING,
                    Tier::Low.label(),
                    Tier::Medium.label(),
                    Tier::High.label(),
                ],
                |row| {
                    Ok(CityTierCount {
                        city: row.get(0)?,
                        tier: tier_at(row, 1)?,
                        event_count: count_at(row, 2)?,
                    })
                },
            )
            .map_err(|source| StoreError::Query { operation, source })?;
        rows.collect::<Result<_, _>>()
            .map_err(|source| StoreError::Query { operation, source })
    }

    /// Event count and average event price midpoint per artist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the query fails.
    pub fn artist_summaries(&self) -> Result<Vec<ArtistSummary>, StoreError> {
        let operation = "summarise artists";
        let mut statement = self
            .connection
            .prepare_cached(ARTIST_SUMMARIES)
            .map_err(|source| StoreError::Query { operation, source })?;
        let rows = statement
            .query_map([], |row| {
                Ok(ArtistSummary {
                    artist: row.get(0)?,
                    event_count: count_at(row, 1)?,
                    average_price: row.get(2)?,
                })
            })
            .map_err(|source| StoreError::Query { operation, source })?;
        rows.collect::<Result<_, _>>()
            .map_err(|source| StoreError::Query { operation, source })
    }

    /// Run all three aggregations.
    ///
    /// # Errors
    ///
    /// Returns the first [`StoreError`] raised by any query.
    pub fn build_report(&self) -> Result<Report, StoreError> {
        Ok(Report {
            genre_prices: self.average_price_by_genre()?,
            city_tiers: self.tier_distribution_by_city()?,
            artists: self.artist_summaries()?,
        })
    }
}

fn tier_at(row: &Row<'_>, index: usize) -> rusqlite::Result<Tier> {
    let label: String = row.get(index)?;
    Tier::from_str(&label)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(index, Type::Text, Box::new(err)))
}

fn count_at(row: &Row<'_>, index: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(index)?;
    u64::try_from(raw).map_err(|err| {
        rusqlite::Error::FromSqlConversionFailure(index, Type::Integer, Box::new(err))
    })
}
