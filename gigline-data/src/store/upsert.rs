//! Deduplicated writes keyed on artist and event names.
//!
//! Name conflicts are absorbed with `ON CONFLICT(name) DO NOTHING`, so a
//! repeated record is a no-op rather than an error. Every other constraint
//! failure (foreign key, `NOT NULL`, `CHECK`) surfaces as
//! [`PersistError::Sqlite`] and aborts the surrounding transaction.

use gigline_core::{Artist, ArtistId, Event, NormalisedRecord};
use log::debug;
use rusqlite::{Connection, Error as SqliteError, OptionalExtension, TransactionBehavior};
use thiserror::Error;

use super::EventDatabase;

const INSERT_ARTIST: &str = "INSERT INTO artists (name, genre, min_price, max_price)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT(name) DO NOTHING
    RETURNING id";

const SELECT_ARTIST_ID: &str = "SELECT id FROM artists WHERE name = ?1";

const INSERT_EVENT: &str =
    "INSERT INTO events (name, artist_id, city, state, min_price, max_price)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)
    ON CONFLICT(name) DO NOTHING";

/// Errors raised while writing records.
#[derive(Debug, Error)]
pub enum PersistError {
    /// An SQLite statement failed; the transaction was rolled back.
    #[error("failed to {operation}")]
    Sqlite {
        /// Operation that failed.
        operation: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
}

/// Whether an event insert created a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new row was written.
    Inserted,
    /// A row with the same name already existed; nothing changed.
    Ignored,
}

/// Row-level outcome of persisting one page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Artists created by this batch.
    pub artists_inserted: usize,
    /// Artist references resolved to an existing row.
    pub artists_existing: usize,
    /// Events created by this batch.
    pub events_inserted: usize,
    /// Events skipped because the name was already stored.
    pub events_ignored: usize,
}

impl BatchSummary {
    /// Add the counts of `other` to this summary.
    #[must_use]
    pub const fn combine(mut self, other: Self) -> Self {
        self.artists_inserted += other.artists_inserted;
        self.artists_existing += other.artists_existing;
        self.events_inserted += other.events_inserted;
        self.events_ignored += other.events_ignored;
        self
    }
}

/// Resolved artist row and whether this call created it.
#[derive(Debug, Clone, Copy)]
struct ArtistRow {
    id: ArtistId,
    created: bool,
}

fn upsert_artist(connection: &Connection, artist: &Artist) -> Result<ArtistRow, PersistError> {
    let mut insert = connection
        .prepare_cached(INSERT_ARTIST)
        .map_err(|source| PersistError::Sqlite {
            operation: "prepare insert artist",
            source,
        })?;
    let inserted: Option<i64> = insert
        .query_row(
            (
                artist.name.as_str(),
                artist.genre.as_str(),
                artist.price.map(|price| price.min),
                artist.price.map(|price| price.max),
            ),
            |row| row.get(0),
        )
        .optional()
        .map_err(|source| PersistError::Sqlite {
            operation: "insert artist",
            source,
        })?;
    if let Some(id) = inserted {
        return Ok(ArtistRow {
            id: ArtistId::new(id),
            created: true,
        });
    }

    let mut select = connection
        .prepare_cached(SELECT_ARTIST_ID)
        .map_err(|source| PersistError::Sqlite {
            operation: "prepare artist lookup",
            source,
        })?;
    let existing: i64 = select
        .query_row([artist.name.as_str()], |row| row.get(0))
        .map_err(|source| PersistError::Sqlite {
            operation: "look up existing artist",
            source,
        })?;
    debug!(
        "artist '{}' already stored as {existing}; keeping its original attributes",
        artist.name
    );
    Ok(ArtistRow {
        id: ArtistId::new(existing),
        created: false,
    })
}

fn insert_event_row(
    connection: &Connection,
    event: &Event,
    artist: ArtistId,
) -> Result<InsertOutcome, PersistError> {
    let mut insert = connection
        .prepare_cached(INSERT_EVENT)
        .map_err(|source| PersistError::Sqlite {
            operation: "prepare insert event",
            source,
        })?;
    let changed = insert
        .execute((
            event.name.as_str(),
            artist.get(),
            event.city.as_str(),
            event.state.as_str(),
            event.price.map(|price| price.min),
            event.price.map(|price| price.max),
        ))
        .map_err(|source| PersistError::Sqlite {
            operation: "insert event",
            source,
        })?;
    if changed == 0 {
        debug!("event '{}' already stored; ignoring", event.name);
        Ok(InsertOutcome::Ignored)
    } else {
        Ok(InsertOutcome::Inserted)
    }
}

impl EventDatabase {
    /// Insert `artist` unless its name exists, returning the row id either way.
    ///
    /// An existing row keeps its original genre and prices.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Sqlite`] if a statement fails.
    pub fn insert_or_fetch_artist(&mut self, artist: &Artist) -> Result<ArtistId, PersistError> {
        let transaction = self.begin_write()?;
        let row = upsert_artist(&transaction, artist)?;
        commit(transaction)?;
        Ok(row.id)
    }

    /// Insert `event` referencing `artist` unless its name exists.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Sqlite`] if a statement fails, including when
    /// `artist` does not reference a stored row.
    pub fn insert_event(
        &mut self,
        event: &Event,
        artist: ArtistId,
    ) -> Result<InsertOutcome, PersistError> {
        let transaction = self.begin_write()?;
        let outcome = insert_event_row(&transaction, event, artist)?;
        commit(transaction)?;
        Ok(outcome)
    }

    /// Persist one page of records in a single transaction.
    ///
    /// Each artist is written before the event that references it. The
    /// transaction takes the write lock up front, so no other writer can
    /// interleave between an ignored insert and the id lookup. On error the
    /// whole page is rolled back.
    ///
    /// # Errors
    ///
    /// Returns [`PersistError::Sqlite`] if any statement fails.
    pub fn persist_batch(
        &mut self,
        records: &[NormalisedRecord],
    ) -> Result<BatchSummary, PersistError> {
        let mut summary = BatchSummary::default();
        if records.is_empty() {
            return Ok(summary);
        }

        let transaction = self.begin_write()?;
        for record in records {
            let artist = upsert_artist(&transaction, &record.artist)?;
            if artist.created {
                summary.artists_inserted += 1;
            } else {
                summary.artists_existing += 1;
            }
            match insert_event_row(&transaction, &record.event, artist.id)? {
                InsertOutcome::Inserted => summary.events_inserted += 1,
                InsertOutcome::Ignored => summary.events_ignored += 1,
            }
        }
        commit(transaction)?;

        debug!(
            "committed batch: {} new artists, {} existing, {} new events, {} ignored",
            summary.artists_inserted,
            summary.artists_existing,
            summary.events_inserted,
            summary.events_ignored
        );
        Ok(summary)
    }

    fn begin_write(&mut self) -> Result<rusqlite::Transaction<'_>, PersistError> {
        self.connection
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|source| PersistError::Sqlite {
                operation: "begin write transaction",
                source,
            })
    }
}

fn commit(transaction: rusqlite::Transaction<'_>) -> Result<(), PersistError> {
    transaction
        .commit()
        .map_err(|source| PersistError::Sqlite {
            operation: "commit write transaction",
            source,
        })
}
