//! Resumable pagination cursors.
//!
//! A cursor holds the index of the next page to fetch for one query context.
//! It starts at zero, advances by exactly one after a page's writes commit,
//! and only goes backwards through [`CursorStore::reset`].

use thiserror::Error;

/// Scope of a cursor, derived from the query keyword.
///
/// Keys are trimmed, then every byte outside `[A-Za-z0-9_-]` is written as
/// `%XX` (uppercase hex of its UTF-8 encoding). The result is safe to embed
/// in a file name, and distinct keywords never share a key.
///
/// # Examples
/// ```
/// use gigline_core::CursorKey;
///
/// let key = CursorKey::new(" Hip Hop/Rap ")?;
/// assert_eq!(key.as_str(), "Hip%20Hop%2FRap");
/// assert_ne!(CursorKey::new("R&B")?, CursorKey::new("R/B")?);
/// assert!(CursorKey::new("  ").is_err());
/// # Ok::<(), gigline_core::CursorKeyError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CursorKey(String);

/// Errors returned by [`CursorKey::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CursorKeyError {
    /// The keyword was empty after trimming.
    #[error("cursor key must not be empty")]
    Empty,
}

impl CursorKey {
    /// Derive a key from a query keyword.
    ///
    /// # Errors
    ///
    /// Returns [`CursorKeyError::Empty`] when `raw` is blank.
    pub fn new(raw: &str) -> Result<Self, CursorKeyError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(CursorKeyError::Empty);
        }
        let mut escaped = String::with_capacity(trimmed.len());
        for byte in trimmed.bytes() {
            if byte.is_ascii_alphanumeric() || byte == b'_' || byte == b'-' {
                escaped.push(char::from(byte));
            } else {
                escaped.push_str(&format!("%{byte:02X}"));
            }
        }
        Ok(Self(escaped))
    }

    /// Borrow the escaped key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CursorKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Errors raised when persisting a cursor.
#[derive(Debug, Error)]
pub enum CursorError {
    /// Writing the cursor failed.
    #[error("failed to {operation} cursor '{key}' at {location}")]
    Io {
        /// Operation that failed, such as `save` or `reset`.
        operation: &'static str,
        /// Cursor scope.
        key: CursorKey,
        /// Backend-specific location, for example a file path.
        location: String,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Key-value persistence for pagination cursors.
///
/// `save` is only called after the page it advances past has been committed;
/// a crash in between means the page is fetched again on the next run.
pub trait CursorStore {
    /// Load the next page index for `key`.
    ///
    /// Missing or unreadable values load as `0`. Implementations log the
    /// fallback instead of failing.
    fn load(&self, key: &CursorKey) -> u32;

    /// Atomically replace the stored value for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] when the value cannot be written.
    fn save(&self, key: &CursorKey, page: u32) -> Result<(), CursorError>;

    /// Reset `key` to zero.
    ///
    /// # Errors
    ///
    /// Returns [`CursorError`] when the value cannot be written.
    fn reset(&self, key: &CursorKey) -> Result<(), CursorError> {
        self.save(key, 0)
    }
}

impl<C: CursorStore + ?Sized> CursorStore for &C {
    fn load(&self, key: &CursorKey) -> u32 {
        (**self).load(key)
    }

    fn save(&self, key: &CursorKey, page: u32) -> Result<(), CursorError> {
        (**self).save(key, page)
    }

    fn reset(&self, key: &CursorKey) -> Result<(), CursorError> {
        (**self).reset(key)
    }
}
