//! SQLite persistence for artists and events.
//!
//! The module is split into focused submodules:
//! - [`schema`] materialises the two tables and their constraints.
//! - `upsert` writes normalised records with natural-key deduplication.
//! - `aggregate` runs the read-only report queries.
//!
//! [`EventDatabase`] is the single handle through which all of them run. It
//! owns one connection for its whole lifetime; dropping it closes the
//! connection on every exit path.
#![forbid(unsafe_code)]

mod aggregate;
pub mod schema;
mod upsert;

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use rusqlite::{Connection, Error as SqliteError};
use thiserror::Error;

pub use schema::{SCHEMA_VERSION, SchemaError, initialise_schema};
pub use upsert::{BatchSummary, InsertOutcome, PersistError};

/// How long a connection waits for another writer's lock before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(10);

/// Errors raised when opening or querying an [`EventDatabase`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The database file does not exist.
    #[error("database {path} does not exist; run an ingest first")]
    Missing {
        /// Expected database location.
        path: Utf8PathBuf,
    },
    /// The database could not be opened.
    #[error("failed to open database {path}")]
    Open {
        /// Database location.
        path: String,
        /// Underlying error.
        #[source]
        source: SqliteError,
    },
    /// Preparing the database location failed.
    #[error("failed to prepare database location {path}")]
    Location {
        /// Database location.
        path: Utf8PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// Connection settings could not be applied.
    #[error("failed to configure database connection: {operation}")]
    Configure {
        /// Setting that failed.
        operation: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
    /// The schema could not be ensured.
    #[error(transparent)]
    Schema(#[from] SchemaError),
    /// A read query failed.
    #[error("failed to {operation}")]
    Query {
        /// Query that failed.
        operation: &'static str,
        /// Underlying SQLite error.
        #[source]
        source: SqliteError,
    },
}

/// Scoped handle over the artist/event database.
///
/// Opening the handle applies [`BUSY_TIMEOUT`], enables foreign keys and
/// ensures the schema exists.
///
/// # Examples
/// ```
/// use gigline_core::{Artist, Event, NormalisedRecord, PriceRange};
/// use gigline_data::store::EventDatabase;
///
/// let mut db = EventDatabase::open_in_memory()?;
/// let price = PriceRange::new(60.0, 100.0);
/// let record = NormalisedRecord {
///     artist: Artist { name: "The Band".into(), genre: "Rock".into(), price },
///     event: Event {
///         name: "Opening Night".into(),
///         city: "Austin".into(),
///         state: "TX".into(),
///         price,
///     },
/// };
///
/// let summary = db.persist_batch(&[record.clone()])?;
/// assert_eq!(summary.events_inserted, 1);
/// let again = db.persist_batch(&[record])?;
/// assert_eq!(again.events_ignored, 1);
/// assert_eq!(db.event_count()?, 1);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
///
/// The SQLite handle stays private; tables change only through the methods
/// above.
/// ```compile_fail
/// use gigline_data::store::EventDatabase;
///
/// let db = EventDatabase::open_in_memory()?;
/// db.connection().execute("DELETE FROM events", [])?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct EventDatabase {
    connection: Connection,
}

impl EventDatabase {
    /// Open or create the database at `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the location cannot be prepared, the file
    /// cannot be opened, or the schema cannot be ensured.
    pub fn open(path: &Utf8Path) -> Result<Self, StoreError> {
        gigline_fs::ensure_parent_dir(path).map_err(|source| StoreError::Location {
            path: path.to_owned(),
            source,
        })?;
        let connection =
            Connection::open(path.as_std_path()).map_err(|source| StoreError::Open {
                path: path.to_string(),
                source,
            })?;
        log::debug!("opened database {path}");
        Self::from_connection(connection)
    }

    /// Open a database that must already exist.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Missing`] when `path` is not a regular file, or
    /// any error [`EventDatabase::open`] can return.
    pub fn open_existing(path: &Utf8Path) -> Result<Self, StoreError> {
        let exists = gigline_fs::file_is_file(path).unwrap_or(false);
        if !exists {
            return Err(StoreError::Missing {
                path: path.to_owned(),
            });
        }
        Self::open(path)
    }

    /// Open a private in-memory database.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if SQLite fails to initialise.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(|source| StoreError::Open {
            path: ":memory:".to_owned(),
            source,
        })?;
        Self::from_connection(connection)
    }

    fn from_connection(mut connection: Connection) -> Result<Self, StoreError> {
        connection
            .busy_timeout(BUSY_TIMEOUT)
            .map_err(|source| StoreError::Configure {
                operation: "set busy timeout",
                source,
            })?;
        initialise_schema(&mut connection)?;
        Ok(Self { connection })
    }

    /// Number of stored artists.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the count fails.
    pub fn artist_count(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM artists", "count artists")
    }

    /// Number of stored events.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Query`] if the count fails.
    pub fn event_count(&self) -> Result<u64, StoreError> {
        self.count("SELECT COUNT(*) FROM events", "count events")
    }

    fn count(&self, sql: &str, operation: &'static str) -> Result<u64, StoreError> {
        self.connection
            .query_row(sql, [], |row| row.get::<_, i64>(0))
            .map(|count| u64::try_from(count).unwrap_or_default())
            .map_err(|source| StoreError::Query { operation, source })
    }
}
