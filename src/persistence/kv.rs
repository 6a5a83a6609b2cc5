//! A minimal persistent key-value interface.
//!
//! The core depends only on [`PersistentKeyValueStore`]: get or set a string
//! under a key, durably. Any medium can implement it; the shipped
//! [`FileKvStore`] writes one file per key, and tests use an in-memory
//! implementation. This keeps the decision logic independent of where the
//! "already prompted" set actually lives.
//!
//! # Atomic Writes
//!
//! `FileKvStore::set` uses the write-to-temp-then-rename pattern:
//! 1. Write to `<key>.json.tmp`
//! 2. fsync the temp file
//! 3. Rename to `<key>.json`
//! 4. fsync the directory
//!
//! Readers therefore always see either the old or the new value, never a
//! partial write, and the value survives a crash immediately after `set`
//! returns.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::fsync::{fsync_dir, fsync_file};

/// Errors from a persistent key-value store.
#[derive(Debug, Error)]
pub enum KvError {
    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The key contains path separators or other unusable characters.
    #[error("invalid key: {0:?}")]
    InvalidKey(String),
}

/// Result type for key-value operations.
pub type Result<T> = std::result::Result<T, KvError>;

/// A durable string-keyed, string-valued store.
///
/// `set` must not return until the value would survive a process restart.
pub trait PersistentKeyValueStore {
    /// Reads the value stored under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Durably stores `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// File-backed store: one `<key>.json` file per key inside a state directory.
#[derive(Debug, Clone)]
pub struct FileKvStore {
    dir: PathBuf,
}

impl FileKvStore {
    /// Creates a store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileKvStore { dir: dir.into() }
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        // Keys become file names; reject anything that would escape the dir.
        if key.is_empty() || key.contains(['/', '\\', '\0']) || key == "." || key == ".." {
            return Err(KvError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl PersistentKeyValueStore for FileKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key)?;
        match std::fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        std::fs::create_dir_all(&self.dir)?;

        let tmp_path = path.with_extension("json.tmp");
        write_fsynced(&tmp_path, value.as_bytes())?;
        std::fs::rename(&tmp_path, &path)?;
        fsync_dir(&self.dir)?;

        Ok(())
    }
}

fn write_fsynced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::io::Write;

    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    fsync_file(&file)
}
