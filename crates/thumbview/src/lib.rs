// Warn on unused dependencies to catch cfg mismatches
#![warn(unused_crate_dependencies)]
// Warn on redundant path prefixes (e.g., std::path::Path when Path is imported)
#![warn(unused_qualifications)]
// Use log::* macros instead of println!/eprintln! for proper log level control
#![deny(clippy::print_stdout, clippy::print_stderr)]

//! Progressive thumbnail listing of a single directory.
//!
//! A [`loader::DirectoryLoader`] collapses bursts of "show directory" requests and drives one
//! pipeline run at a time (reset, placeholder rows, icons). Worker stages never touch the
//! visual surface directly: they send [`surface::SurfaceCommand`]s that the surface-owning
//! [`surface::ThumbnailView`] applies on its own thread.

//noinspection RsUnusedImport
// Silence false positives for dev dependencies (used only in benches/ and test modules)
#[cfg(test)]
use criterion as _;
#[cfg(test)]
use env_logger as _;
#[cfg(test)]
use tempfile as _;

pub mod config;
pub mod file_system;
pub mod icons;
mod ignore_poison;
pub mod listing;
pub mod loader;
pub mod pipeline;
pub mod settings;
pub mod surface;

pub use config::ViewConfig;
pub use file_system::{Activation, EntryKind, FileSystemProvider, FsEntry, InMemoryFileSystem, LocalFileSystem};
pub use icons::{Icon, IconError, IconProvider, ThumbnailIconProvider};
pub use listing::{ColumnDataType, Row, RowId, RowIndex, SortOrder, SortSpec};
pub use loader::{DirectoryLoader, LoaderStatus};
pub use pipeline::{CancellationToken, RunId, RunOutcome, RunReport};
pub use surface::{RecordingSurface, Surface, SurfaceCommand, SurfaceSender, ThumbnailView, ViewMode};

/// Installs `env_logger` for a test binary. Safe to call from every test.
#[cfg(test)]
pub(crate) fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
