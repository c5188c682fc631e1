//! The visual surface and the hand-off to it.
//!
//! The surface belongs to one thread (the UI thread of the host). Pipeline workers never
//! touch it; they push [`SurfaceCommand`]s through a [`SurfaceSender`], and the owner drains
//! them into a [`ThumbnailView`], which updates its rows and forwards the changes to the
//! host's [`Surface`] widget.

mod recording;
mod view;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::file_system::FsEntry;
use crate::icons::Icon;
use crate::listing::{Row, RowId};
use crate::pipeline::RunId;

pub use recording::{RecordingSurface, SurfaceEvent};
pub use view::ThumbnailView;

/// The host's list widget. All calls happen on the thread that owns the [`ThumbnailView`].
pub trait Surface {
    /// A new row became visible at `position`.
    fn add_row(&mut self, row: &Row, position: usize);

    /// All rows are gone.
    fn clear_rows(&mut self);

    fn update_row_icon(&mut self, id: RowId, large: &Icon, small: &Icon);

    /// Repaint just this row.
    fn request_redraw(&mut self, id: RowId);

    /// Rows were re-sorted; `order` is the new top-to-bottom order.
    fn reorder(&mut self, order: &[RowId]) {
        let _ = order;
    }
}

/// Large thumbnails or a details table.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum ViewMode {
    #[default]
    LargeIcon,
    Details,
}

/// A change produced by a pipeline worker, tagged with the run that produced it.
#[derive(Debug, Clone)]
pub enum SurfaceCommand {
    /// Drop every row. Starts `run`; commands of older runs are ignored from here on.
    Reset { run: RunId },
    /// Show a placeholder row bound to `entry`.
    AddRow { run: RunId, row: Row, entry: FsEntry },
    /// Attach icons to an existing row.
    SetIcons {
        run: RunId,
        id: RowId,
        large: Icon,
        small: Icon,
    },
}

impl SurfaceCommand {
    pub fn run(&self) -> RunId {
        match self {
            Self::Reset { run } | Self::AddRow { run, .. } | Self::SetIcons { run, .. } => *run,
        }
    }
}

/// Worker-side end of the hand-off. Cheap to clone, usable from any thread.
#[derive(Debug, Clone)]
pub struct SurfaceSender {
    tx: mpsc::UnboundedSender<SurfaceCommand>,
}

impl SurfaceSender {
    /// Creates a connected sender/receiver pair.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<SurfaceCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Queues `command` for the surface owner. Returns false if the view is gone.
    pub fn send(&self, command: SurfaceCommand) -> bool {
        self.tx.send(command).is_ok()
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

#[cfg(test)]
mod view_test;
