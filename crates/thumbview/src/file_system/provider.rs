//! Directory enumeration behind a trait, so the pipeline can run against the real disk or
//! an in-memory tree.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use super::entry::FsEntry;
use crate::ignore_poison::IgnorePoisonRw;

/// Error type for directory enumeration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    /// Path not found
    NotFound(String),
    /// Permission denied
    PermissionDenied(String),
    /// Path exists but isn't a directory
    NotADirectory(String),
    /// Generic I/O error
    Io(String),
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "Path not found: {}", path),
            Self::PermissionDenied(path) => write!(f, "Permission denied: {}", path),
            Self::NotADirectory(path) => write!(f, "Not a directory: {}", path),
            Self::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<std::io::Error> for ProviderError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(err.to_string()),
            std::io::ErrorKind::NotADirectory => Self::NotADirectory(err.to_string()),
            _ => Self::Io(err.to_string()),
        }
    }
}

/// Lazy, finite sequence of directory children. Dropping it stops enumeration.
pub type EntryIter = Box<dyn Iterator<Item = Result<FsEntry, ProviderError>> + Send>;

/// Source of directory listings.
pub trait FileSystemProvider: Send + Sync {
    /// Enumerates the direct children of `directory` in whatever order the backend yields them.
    ///
    /// An `Err` here means the whole directory is unreadable. Per-entry `Err` items mean a
    /// single child couldn't even be named; entries whose metadata is unreadable should still
    /// be yielded with empty size/date.
    fn list_children(&self, directory: &Path) -> Result<EntryIter, ProviderError>;
}

// ============================================================================
// Local disk
// ============================================================================

/// Reads the real file system with `std::fs::read_dir`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

impl FileSystemProvider for LocalFileSystem {
    fn list_children(&self, directory: &Path) -> Result<EntryIter, ProviderError> {
        let metadata = fs::metadata(directory)?;
        if !metadata.is_dir() {
            return Err(ProviderError::NotADirectory(directory.display().to_string()));
        }
        let read_dir = fs::read_dir(directory)?;
        Ok(Box::new(read_dir.map(|entry| {
            let entry = entry?;
            Ok(process_dir_entry(&entry))
        })))
    }
}

/// Turns a `DirEntry` into an `FsEntry`, following symlinks to decide directory-ness.
/// Falls back to a size-less, date-less file entry when metadata can't be read.
fn process_dir_entry(entry: &fs::DirEntry) -> FsEntry {
    let path = entry.path();
    let Ok(file_type) = entry.file_type() else {
        return FsEntry::file(path, None, None);
    };

    let target_is_dir = if file_type.is_symlink() {
        fs::metadata(&path).map(|m| m.is_dir()).unwrap_or(false)
    } else {
        false
    };

    let Ok(metadata) = entry.metadata() else {
        return if target_is_dir {
            FsEntry::directory(path, None)
        } else {
            FsEntry::file(path, None, None)
        };
    };

    let modified = metadata.modified().ok().map(DateTime::<Utc>::from);

    if metadata.is_dir() || target_is_dir {
        FsEntry::directory(path, modified)
    } else {
        FsEntry::file(path, Some(metadata.len()), modified)
    }
}

// ============================================================================
// In-memory tree
// ============================================================================

/// Directory tree kept in memory. Used by tests and demos; also handy for hosts that list
/// something other than a disk (archive contents, search results).
#[derive(Default)]
pub struct InMemoryFileSystem {
    directories: RwLock<HashMap<PathBuf, Result<Vec<FsEntry>, ProviderError>>>,
    /// Sleep before yielding each entry, to simulate slow storage.
    entry_delay: Option<Duration>,
}

impl InMemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every entry takes `delay` to enumerate.
    pub fn with_entry_delay(mut self, delay: Duration) -> Self {
        self.entry_delay = Some(delay);
        self
    }

    /// Registers (or replaces) a directory and its children.
    pub fn insert_directory(&self, path: impl Into<PathBuf>, entries: Vec<FsEntry>) {
        self.directories.write_ignore_poison().insert(path.into(), Ok(entries));
    }

    /// Makes listing `path` fail with `error`.
    pub fn insert_failing_directory(&self, path: impl Into<PathBuf>, error: ProviderError) {
        self.directories.write_ignore_poison().insert(path.into(), Err(error));
    }

    /// Builds `count` files named `file_00000.txt`, ... under `path`.
    pub fn with_file_count(self, path: impl Into<PathBuf>, count: usize) -> Self {
        let path = path.into();
        let entries = (0..count)
            .map(|i| FsEntry::file(path.join(format!("file_{:05}.txt", i)), Some(i as u64), None))
            .collect();
        self.insert_directory(path, entries);
        self
    }
}

impl FileSystemProvider for InMemoryFileSystem {
    fn list_children(&self, directory: &Path) -> Result<EntryIter, ProviderError> {
        let entries = match self.directories.read_ignore_poison().get(directory) {
            Some(Ok(entries)) => entries.clone(),
            Some(Err(e)) => return Err(e.clone()),
            None => return Err(ProviderError::NotFound(directory.display().to_string())),
        };
        let delay = self.entry_delay;
        Ok(Box::new(entries.into_iter().map(move |entry| {
            if let Some(delay) = delay {
                std::thread::sleep(delay);
            }
            Ok(entry)
        })))
    }
}
