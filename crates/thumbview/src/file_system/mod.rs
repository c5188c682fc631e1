//! File system module - entries, activation, and listing providers.

mod entry;
mod provider;

pub use entry::{Activation, EntryKind, FsEntry};
pub use provider::{EntryIter, FileSystemProvider, InMemoryFileSystem, LocalFileSystem, ProviderError};
