//! File-backed cursor persistence.
//!
//! Each cursor lives in its own plain-text file holding a single decimal
//! integer, `<dir>/current_page_<key>.txt`. Writes replace the file
//! atomically through [`gigline_fs::write_atomic`].

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use gigline_core::{CursorError, CursorKey, CursorStore};
use log::{debug, warn};

/// Prefix of every cursor file name.
pub const CURSOR_FILE_PREFIX: &str = "current_page_";

/// [`CursorStore`] keeping one file per key inside a directory.
///
/// # Examples
/// ```
/// use camino::Utf8PathBuf;
/// use gigline_core::{CursorKey, CursorStore};
/// use gigline_data::cursor::FileCursorStore;
///
/// let temp = tempfile::tempdir().expect("create temp dir");
/// let dir = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).expect("utf-8 path");
/// let store = FileCursorStore::new(&dir);
/// let key = CursorKey::new("Rock")?;
///
/// assert_eq!(store.load(&key), 0);
/// store.save(&key, 4)?;
/// assert_eq!(store.load(&key), 4);
/// assert!(dir.join("current_page_Rock.txt").exists());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCursorStore {
    dir: Utf8PathBuf,
}

impl FileCursorStore {
    /// Store cursors inside `dir`. The directory is created on first save.
    #[must_use]
    pub fn new(dir: impl AsRef<Utf8Path>) -> Self {
        Self {
            dir: dir.as_ref().to_owned(),
        }
    }

    /// Directory holding the cursor files.
    #[must_use]
    pub fn dir(&self) -> &Utf8Path {
        &self.dir
    }

    /// File holding the cursor for `key`.
    #[must_use]
    pub fn path_for(&self, key: &CursorKey) -> Utf8PathBuf {
        self.dir.join(format!("{CURSOR_FILE_PREFIX}{key}.txt"))
    }

    fn write(&self, operation: &'static str, key: &CursorKey, page: u32) -> Result<(), CursorError> {
        let path = self.path_for(key);
        gigline_fs::write_atomic(&path, page.to_string().as_bytes()).map_err(|source| {
            CursorError::Io {
                operation,
                key: key.clone(),
                location: path.to_string(),
                source,
            }
        })?;
        debug!("cursor '{key}' set to {page} at {path}");
        Ok(())
    }
}

impl CursorStore for FileCursorStore {
    fn load(&self, key: &CursorKey) -> u32 {
        let path = self.path_for(key);
        let contents = match gigline_fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no cursor for '{key}' at {path}; starting at page 0");
                return 0;
            }
            Err(err) => {
                warn!("failed to read cursor '{key}' at {path}: {err}; starting at page 0");
                return 0;
            }
        };
        contents.trim().parse().unwrap_or_else(|err| {
            warn!("cursor '{key}' at {path} is corrupt ({err}); starting at page 0");
            0
        })
    }

    fn save(&self, key: &CursorKey, page: u32) -> Result<(), CursorError> {
        self.write("save", key, page)
    }

    fn reset(&self, key: &CursorKey) -> Result<(), CursorError> {
        self.write("reset", key, 0)
    }
}
