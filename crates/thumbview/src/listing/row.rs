//! Rows and the row index.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::file_system::FsEntry;
use crate::icons::Icon;

/// Format of the "Date" column. Also the first format the DateTime comparer tries.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column indices.
pub const NAME_COLUMN: usize = 0;
pub const SIZE_COLUMN: usize = 1;
pub const TYPE_COLUMN: usize = 2;
pub const DATE_COLUMN: usize = 3;

/// Identity of a row. Unique for the lifetime of a loader, across runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

impl RowId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// Hands out row ids. Shared by every run of a loader so ids never repeat.
#[derive(Debug, Default)]
pub struct RowIdAllocator {
    next: AtomicU64,
}

impl RowIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allocate(&self) -> RowId {
        RowId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// One visual record. Starts as a placeholder (no icons); the icon stage fills the icons in.
#[derive(Debug, Clone)]
pub struct Row {
    pub id: RowId,
    /// Name, size, type, date.
    pub columns: [String; 4],
    pub large_icon: Option<Icon>,
    pub small_icon: Option<Icon>,
}

impl Row {
    pub fn placeholder(id: RowId, entry: &FsEntry) -> Self {
        let size = entry.size.map(|s| s.to_string()).unwrap_or_default();
        let date = entry
            .modified
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        Self {
            id,
            columns: [entry.name.clone(), size, entry.display_type().to_string(), date],
            large_icon: None,
            small_icon: None,
        }
    }

    /// Text of column `index`; empty for out-of-range columns.
    pub fn column(&self, index: usize) -> &str {
        self.columns.get(index).map(String::as_str).unwrap_or("")
    }

    pub fn name(&self) -> &str {
        self.column(NAME_COLUMN)
    }

    pub fn has_icons(&self) -> bool {
        self.large_icon.is_some() && self.small_icon.is_some()
    }
}

/// Row id -> entry, remembering discovery order.
#[derive(Debug, Clone, Default)]
pub struct RowIndex {
    order: Vec<RowId>,
    entries: HashMap<RowId, FsEntry>,
}

impl RowIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a mapping. Returns false, leaving the index unchanged, if `id` is already present.
    pub fn insert(&mut self, id: RowId, entry: FsEntry) -> bool {
        if self.entries.contains_key(&id) {
            return false;
        }
        self.order.push(id);
        self.entries.insert(id, entry);
        true
    }

    pub fn get(&self, id: RowId) -> Option<&FsEntry> {
        self.entries.get(&id)
    }

    pub fn contains(&self, id: RowId) -> bool {
        self.entries.contains_key(&id)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Entries in insertion (discovery) order.
    pub fn iter(&self) -> impl Iterator<Item = (RowId, &FsEntry)> + '_ {
        self.order.iter().filter_map(|id| self.entries.get(id).map(|entry| (*id, entry)))
    }
}
