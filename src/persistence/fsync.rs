//! Durability helpers for the eligibility store.
//!
//! A feedback prompt must never be shown twice, even if the process dies
//! between polls. That makes every eligibility write a durability point: the
//! file contents must be synced, and after a rename the directory entry must
//! be synced too: on POSIX the rename lives in the directory, and an
//! unsynced directory can lose it across a power cut.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

/// Syncs a file's contents and metadata to disk (`fsync(2)`).
pub fn fsync_file(file: &File) -> io::Result<()> {
    file.sync_all()
}

/// Syncs a directory so newly created or renamed entries are durable.
///
/// Only meaningful for directory paths, though `sync_all` happens to accept
/// regular files as well.
pub fn fsync_dir(dir: &Path) -> io::Result<()> {
    let handle = OpenOptions::new().read(true).open(dir)?;
    handle.sync_all()
}
