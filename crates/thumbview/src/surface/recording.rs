//! A surface that just remembers what happened to it.

use super::Surface;
use crate::icons::Icon;
use crate::listing::{Row, RowId};

/// One call made on a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Added { id: RowId, name: String, position: usize },
    Cleared,
    IconUpdated(RowId),
    Redrawn(RowId),
    Reordered(Vec<RowId>),
}

/// Headless [`Surface`]. Useful for tests and for hosts that render from the view's rows
/// directly and only need a change log.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub events: Vec<SurfaceEvent>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Names added after the last clear, in the order they were added.
    pub fn names_since_last_clear(&self) -> Vec<&str> {
        let start = self
            .events
            .iter()
            .rposition(|e| *e == SurfaceEvent::Cleared)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.events[start..]
            .iter()
            .filter_map(|e| match e {
                SurfaceEvent::Added { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_count(&self) -> usize {
        self.events.iter().filter(|e| **e == SurfaceEvent::Cleared).count()
    }
}

impl Surface for RecordingSurface {
    fn add_row(&mut self, row: &Row, position: usize) {
        self.events.push(SurfaceEvent::Added {
            id: row.id,
            name: row.name().to_string(),
            position,
        });
    }

    fn clear_rows(&mut self) {
        self.events.push(SurfaceEvent::Cleared);
    }

    fn update_row_icon(&mut self, id: RowId, _large: &Icon, _small: &Icon) {
        self.events.push(SurfaceEvent::IconUpdated(id));
    }

    fn request_redraw(&mut self, id: RowId) {
        self.events.push(SurfaceEvent::Redrawn(id));
    }

    fn reorder(&mut self, order: &[RowId]) {
        self.events.push(SurfaceEvent::Reordered(order.to_vec()));
    }
}
