//! Tests for applying worker commands to the surface-owning view.

use chrono::{TimeZone, Utc};

use super::*;
use crate::config::{MIN_COLUMN_WIDTH, ViewConfig};
use crate::file_system::{Activation, FsEntry};
use crate::icons::Icon;
use crate::listing::{
    ColumnDataType, DATE_COLUMN, NAME_COLUMN, Row, RowIdAllocator, SIZE_COLUMN, SortOrder, SortSpec, TYPE_COLUMN,
};

struct Harness {
    view: ThumbnailView<RecordingSurface>,
    ids: RowIdAllocator,
}

impl Harness {
    fn new() -> Self {
        Self::with_config(ViewConfig::default())
    }

    fn with_config(config: ViewConfig) -> Self {
        let (view, _sender) = ThumbnailView::new(RecordingSurface::new(), &config);
        Self {
            view,
            ids: RowIdAllocator::new(),
        }
    }

    fn reset(&mut self, run: u64) {
        self.view.apply(SurfaceCommand::Reset { run: RunId(run) });
    }

    fn add(&mut self, run: u64, entry: FsEntry) -> RowId {
        let row = Row::placeholder(self.ids.allocate(), &entry);
        let id = row.id;
        self.view.apply(SurfaceCommand::AddRow {
            run: RunId(run),
            row,
            entry,
        });
        id
    }

    fn add_file(&mut self, run: u64, name: &str, size: u64) -> RowId {
        self.add(run, FsEntry::file(format!("/d/{}", name), Some(size), None))
    }

    fn set_icons(&mut self, run: u64, id: RowId) {
        self.view.apply(SurfaceCommand::SetIcons {
            run: RunId(run),
            id,
            large: Icon::generic(4, [0, 0, 0, 255]),
            small: Icon::generic(2, [0, 0, 0, 255]),
        });
    }
}

#[test]
fn test_rows_insert_at_sorted_position() {
    let mut h = Harness::with_config(ViewConfig {
        default_sort: SortSpec::by_name(),
        ..ViewConfig::default()
    });
    h.reset(1);
    h.add_file(1, "b.txt", 1);
    h.add_file(1, "c.txt", 1);
    h.add_file(1, "a.txt", 1);

    assert_eq!(h.view.names(), vec!["a.txt", "b.txt", "c.txt"]);
    let positions: Vec<usize> = h
        .view
        .surface()
        .events
        .iter()
        .filter_map(|e| match e {
            SurfaceEvent::Added { position, .. } => Some(*position),
            _ => None,
        })
        .collect();
    assert_eq!(positions, vec![0, 1, 0]);
}

#[test]
fn test_commands_from_other_runs_are_dropped() {
    let mut h = Harness::new();
    h.reset(2);
    let stale = h.add_file(1, "old.txt", 1);
    h.set_icons(1, stale);
    let fresh = h.add_file(2, "new.txt", 1);

    assert_eq!(h.view.names(), vec!["new.txt"]);
    assert!(h.view.entry(stale).is_none());
    assert!(h.view.entry(fresh).is_some());
    assert_eq!(h.view.index().len(), 1);
}

#[test]
fn test_stale_reset_is_ignored() {
    let mut h = Harness::new();
    h.reset(3);
    h.add_file(3, "keep.txt", 1);
    h.reset(2);

    assert_eq!(h.view.current_run(), Some(RunId(3)));
    assert_eq!(h.view.names(), vec!["keep.txt"]);
    assert_eq!(h.view.surface().clear_count(), 1);
}

#[test]
fn test_reset_clears_rows_and_index() {
    let mut h = Harness::new();
    h.reset(1);
    h.add_file(1, "a.txt", 1);
    h.reset(2);

    assert!(h.view.rows().is_empty());
    assert!(h.view.index().is_empty());
    assert_eq!(h.view.surface().clear_count(), 2);
}

#[test]
fn test_reset_on_empty_view_is_harmless() {
    let mut h = Harness::new();
    h.reset(1);
    h.reset(1);
    assert!(h.view.rows().is_empty());
    assert_eq!(h.view.current_run(), Some(RunId(1)));
}

#[test]
fn test_duplicate_row_id_is_rejected() {
    let mut h = Harness::new();
    h.reset(1);
    let entry = FsEntry::file("/d/a.txt", Some(1), None);
    let row = Row::placeholder(h.ids.allocate(), &entry);
    for _ in 0..2 {
        h.view.apply(SurfaceCommand::AddRow {
            run: RunId(1),
            row: row.clone(),
            entry: entry.clone(),
        });
    }
    assert_eq!(h.view.rows().len(), 1);
    assert_eq!(h.view.index().len(), 1);
}

#[test]
fn test_icons_update_then_redraw() {
    let mut h = Harness::new();
    h.reset(1);
    let id = h.add_file(1, "a.txt", 1);
    h.set_icons(1, id);

    let row = h.view.row(id).unwrap();
    assert!(row.has_icons());
    let events = &h.view.surface().events;
    assert_eq!(
        &events[events.len() - 2..],
        &[SurfaceEvent::IconUpdated(id), SurfaceEvent::Redrawn(id)]
    );
}

#[test]
fn test_icons_for_unknown_row_are_ignored() {
    let mut h = Harness::new();
    h.reset(1);
    h.add_file(1, "a.txt", 1);
    let unknown = h.ids.allocate();
    h.set_icons(1, unknown);

    assert!(!h.view.surface().events.contains(&SurfaceEvent::IconUpdated(unknown)));
}

#[test]
fn test_click_column_toggles_and_switches() {
    let mut h = Harness::new();
    assert_eq!(h.view.sort_spec(), SortSpec::default());

    h.view.click_column(TYPE_COLUMN);
    assert_eq!(h.view.sort_spec().order, SortOrder::Descending);

    h.view.click_column(SIZE_COLUMN);
    let spec = h.view.sort_spec();
    assert_eq!(spec.column, SIZE_COLUMN);
    assert_eq!(spec.data_type, ColumnDataType::Numeric);
    // Direction carries over to the new column
    assert_eq!(spec.order, SortOrder::Descending);

    h.view.click_column(SIZE_COLUMN);
    assert_eq!(h.view.sort_spec().order, SortOrder::Ascending);
}

#[test]
fn test_resort_moves_rows_with_and_without_icons() {
    let mut h = Harness::with_config(ViewConfig {
        default_sort: SortSpec::by_name(),
        ..ViewConfig::default()
    });
    h.reset(1);
    let small = h.add_file(1, "a.bin", 5);
    let big = h.add_file(1, "b.bin", 500);
    let dir = h.add(1, FsEntry::directory("/d/c", None));
    h.set_icons(1, big);

    h.view.set_sort_spec(SortSpec::for_column(SIZE_COLUMN, SortOrder::Descending));

    // The directory has no size and goes last in descending order
    let order: Vec<RowId> = h.view.rows().iter().map(|r| r.id).collect();
    assert_eq!(order, vec![big, small, dir]);
    assert_eq!(
        h.view.surface().events.last(),
        Some(&SurfaceEvent::Reordered(vec![big, small, dir]))
    );
}

#[test]
fn test_rows_added_after_sort_change_follow_new_order() {
    let mut h = Harness::new();
    h.reset(1);
    h.add_file(1, "a.txt", 30);
    h.add_file(1, "b.txt", 10);
    h.view.set_sort_spec(SortSpec::new(SIZE_COLUMN, ColumnDataType::Numeric, SortOrder::Ascending));
    h.add_file(1, "c.txt", 20);

    assert_eq!(h.view.names(), vec!["b.txt", "c.txt", "a.txt"]);
}

#[test]
fn test_date_column_sorts_chronologically() {
    let mut h = Harness::new();
    h.view.set_sort_spec(SortSpec::for_column(DATE_COLUMN, SortOrder::Ascending));
    h.reset(1);
    let late = Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap();
    let early = Utc.with_ymd_and_hms(2023, 12, 31, 23, 0, 0).unwrap();
    h.add(1, FsEntry::file("/d/late.txt", Some(1), Some(late)));
    h.add(1, FsEntry::file("/d/early.txt", Some(1), Some(early)));

    assert_eq!(h.view.names(), vec!["early.txt", "late.txt"]);
}

#[test]
fn test_activation_by_entry_kind() {
    let mut h = Harness::new();
    h.reset(1);
    let dir = h.add(1, FsEntry::directory("/d/photos", None));
    let image = h.add_file(1, "cat.png", 10);
    let archive = h.add_file(1, "stuff.zip", 10);
    let text = h.add_file(1, "notes.txt", 10);

    assert!(matches!(h.view.activate(dir), Some(Activation::OpenDirectory(_))));
    assert!(matches!(h.view.activate(image), Some(Activation::OpenImage(_))));
    assert!(matches!(h.view.activate(archive), Some(Activation::OpenArchive(_))));
    assert_eq!(h.view.activate(text), None);
    assert_eq!(
        h.view.activate(dir).unwrap().entry().path,
        std::path::PathBuf::from("/d/photos")
    );
}

#[test]
fn test_activation_of_unknown_row_is_none() {
    let mut h = Harness::new();
    h.reset(1);
    let unknown = h.ids.allocate();
    assert_eq!(h.view.activate(unknown), None);
}

#[test]
fn test_details_mode_resizes_columns() {
    let mut h = Harness::new();
    h.reset(1);
    h.add_file(1, "a_rather_long_file_name.txt", 1);
    assert_eq!(h.view.column_widths(), [MIN_COLUMN_WIDTH; 4]);

    h.view.set_view_mode(ViewMode::Details);

    assert_eq!(h.view.view_mode(), ViewMode::Details);
    let widths = h.view.column_widths();
    assert!(widths[NAME_COLUMN] > MIN_COLUMN_WIDTH);
    // Short content still gets the minimum
    assert_eq!(widths[SIZE_COLUMN], MIN_COLUMN_WIDTH);
}

#[test]
fn test_next_command_reports_closed_channel() {
    let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
    let (mut view, sender) = ThumbnailView::new(RecordingSurface::new(), &ViewConfig::default());
    sender.send(SurfaceCommand::Reset { run: RunId(1) });
    drop(sender);

    runtime.block_on(async {
        assert!(view.next_command().await);
        assert!(!view.next_command().await);
    });
    assert_eq!(view.current_run(), Some(RunId(1)));
}

#[test]
fn test_sender_sees_dropped_view() {
    let (view, sender) = ThumbnailView::new(RecordingSurface::new(), &ViewConfig::default());
    assert!(!sender.is_closed());
    assert!(sender.send(SurfaceCommand::Reset { run: RunId(1) }));

    drop(view);

    assert!(sender.is_closed());
    assert!(!sender.send(SurfaceCommand::Reset { run: RunId(2) }));
}

#[test]
fn test_host_can_clear_its_surface_log() {
    let mut h = Harness::new();
    h.reset(1);
    h.add_file(1, "a.txt", 1);
    h.view.surface_mut().events.clear();

    let id = h.add_file(1, "b.txt", 1);

    assert_eq!(h.view.surface().names_since_last_clear(), vec!["b.txt"]);
    assert!(matches!(h.view.surface().events[..], [SurfaceEvent::Added { id: added, .. }] if added == id));
}
