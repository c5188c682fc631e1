//! File system entries and what activating one means.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Extensions opened by the archive browser rather than the image viewer.
const ARCHIVE_EXTENSIONS: &[&str] = &[
    "zip", "rar", "7z", "tar", "gz", "tgz", "bz2", "xz", "lzh", "lha", "arj", "cab",
];

/// Directory or file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryKind {
    Directory,
    File,
}

/// One direct child of a listed directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FsEntry {
    pub kind: EntryKind,
    pub name: String,
    pub path: PathBuf,
    /// Bytes. `None` for directories and for files whose metadata couldn't be read.
    pub size: Option<u64>,
    /// Lower-case, without the dot. Empty when the name has none.
    pub extension: String,
    pub modified: Option<DateTime<Utc>>,
}

impl FsEntry {
    /// Builds a directory entry; the name is taken from the last path component.
    pub fn directory(path: impl Into<PathBuf>, modified: Option<DateTime<Utc>>) -> Self {
        let path = path.into();
        Self {
            kind: EntryKind::Directory,
            name: file_name_of(&path),
            path,
            size: None,
            extension: String::new(),
            modified,
        }
    }

    /// Builds a file entry; name and extension are taken from the path.
    pub fn file(path: impl Into<PathBuf>, size: Option<u64>, modified: Option<DateTime<Utc>>) -> Self {
        let path = path.into();
        let name = file_name_of(&path);
        Self {
            kind: EntryKind::File,
            extension: extension_of(&name),
            name,
            path,
            size,
            modified,
        }
    }

    pub fn is_directory(&self) -> bool {
        self.kind == EntryKind::Directory
    }

    /// Dotfiles like `.gitignore`.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Text shown in the "Type" column.
    pub fn display_type(&self) -> &str {
        match self.kind {
            EntryKind::Directory => "Directory",
            EntryKind::File => &self.extension,
        }
    }

    /// True when the `image` crate recognises this extension and was built with a decoder for it.
    pub fn is_supported_image(&self) -> bool {
        self.kind == EntryKind::File
            && image::ImageFormat::from_extension(&self.extension).is_some_and(|format| format.reading_enabled())
    }

    pub fn is_archive(&self) -> bool {
        self.kind == EntryKind::File && ARCHIVE_EXTENSIONS.contains(&self.extension.as_str())
    }

    /// What double-clicking this entry should do.
    pub fn activation(&self) -> Option<Activation> {
        if self.is_directory() {
            Some(Activation::OpenDirectory(self.clone()))
        } else if self.is_supported_image() {
            Some(Activation::OpenImage(self.clone()))
        } else if self.is_archive() {
            Some(Activation::OpenArchive(self.clone()))
        } else {
            None
        }
    }
}

/// Result of activating a row. The host decides how to act on it; `OpenDirectory` normally
/// goes straight back into [`crate::DirectoryLoader::show_directory`].
#[derive(Debug, Clone, PartialEq)]
pub enum Activation {
    OpenDirectory(FsEntry),
    OpenImage(FsEntry),
    OpenArchive(FsEntry),
}

impl Activation {
    pub fn entry(&self) -> &FsEntry {
        match self {
            Self::OpenDirectory(entry) | Self::OpenImage(entry) | Self::OpenArchive(entry) => entry,
        }
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

/// `archive.tar.gz` -> `gz`, `.gitignore` -> ``, `README` -> ``.
fn extension_of(name: &str) -> String {
    match name.rfind('.') {
        Some(dot_pos) if dot_pos > 0 && dot_pos < name.len() - 1 => name[dot_pos + 1..].to_lowercase(),
        _ => String::new(),
    }
}
