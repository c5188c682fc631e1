//! The request debouncer as a pure state machine. The controller feeds it events and carries
//! out the actions it returns.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where the loader is between requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LoaderStatus {
    /// No run in flight, no request waiting.
    #[default]
    Idle,
    /// A run is in flight and nothing is waiting behind it.
    Busy,
    /// The run in flight was told to stop; a newer target waits for it to wind down.
    PendingSwap,
}

/// What the controller has to do after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DebounceAction {
    Nothing,
    /// Start a run for this directory.
    Start(PathBuf),
    /// Cancel the run in flight and arm the poll timer.
    CancelAndArm,
    /// Disarm the poll timer, then start a run for this directory.
    DisarmAndStart(PathBuf),
    /// Cancel the run in flight.
    Cancel,
    /// Cancel the run in flight and disarm the poll timer.
    CancelAndDisarm,
    /// The timer fired with nothing to do.
    Disarm,
}

#[derive(Debug, Default)]
pub(crate) struct Debouncer {
    status: LoaderStatus,
    /// Most recent target while in `PendingSwap`.
    pending: Option<PathBuf>,
}

impl Debouncer {
    pub fn status(&self) -> LoaderStatus {
        self.status
    }

    pub fn pending(&self) -> Option<&PathBuf> {
        self.pending.as_ref()
    }

    /// A caller asked to show `directory`.
    pub fn on_request(&mut self, directory: PathBuf) -> DebounceAction {
        match self.status {
            LoaderStatus::Idle => {
                self.status = LoaderStatus::Busy;
                DebounceAction::Start(directory)
            }
            LoaderStatus::Busy => {
                self.pending = Some(directory);
                self.status = LoaderStatus::PendingSwap;
                DebounceAction::CancelAndArm
            }
            LoaderStatus::PendingSwap => {
                // Last request wins; the timer is already armed.
                self.pending = Some(directory);
                DebounceAction::Nothing
            }
        }
    }

    /// The poll timer fired. `run_active` says whether the cancelled run is still winding down.
    pub fn on_tick(&mut self, run_active: bool) -> DebounceAction {
        match self.status {
            LoaderStatus::PendingSwap if run_active => DebounceAction::Nothing,
            LoaderStatus::PendingSwap => match self.pending.take() {
                Some(directory) => {
                    self.status = LoaderStatus::Busy;
                    DebounceAction::DisarmAndStart(directory)
                }
                None => {
                    self.status = LoaderStatus::Idle;
                    DebounceAction::Disarm
                }
            },
            LoaderStatus::Idle | LoaderStatus::Busy => DebounceAction::Disarm,
        }
    }

    /// The run in flight reached its terminal state.
    pub fn on_run_finished(&mut self) {
        // In PendingSwap the timer picks up the pending target on its next tick.
        if self.status == LoaderStatus::Busy {
            self.status = LoaderStatus::Idle;
        }
    }

    /// The caller gave up on the current load and anything queued behind it.
    pub fn on_abort(&mut self, run_active: bool) -> DebounceAction {
        match self.status {
            LoaderStatus::Idle => DebounceAction::Nothing,
            LoaderStatus::Busy => DebounceAction::Cancel,
            LoaderStatus::PendingSwap => {
                self.pending = None;
                self.status = if run_active {
                    LoaderStatus::Busy
                } else {
                    LoaderStatus::Idle
                };
                DebounceAction::CancelAndDisarm
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy() -> Debouncer {
        let mut debouncer = Debouncer::default();
        debouncer.on_request(PathBuf::from("/a"));
        debouncer
    }

    #[test]
    fn idle_request_starts_immediately() {
        let mut debouncer = Debouncer::default();
        assert_eq!(
            debouncer.on_request(PathBuf::from("/a")),
            DebounceAction::Start(PathBuf::from("/a"))
        );
        assert_eq!(debouncer.status(), LoaderStatus::Busy);
    }

    #[test]
    fn busy_request_cancels_and_waits() {
        let mut debouncer = busy();
        assert_eq!(debouncer.on_request(PathBuf::from("/b")), DebounceAction::CancelAndArm);
        assert_eq!(debouncer.status(), LoaderStatus::PendingSwap);
        assert_eq!(debouncer.pending(), Some(&PathBuf::from("/b")));
    }

    #[test]
    fn pending_request_overwrites_target() {
        let mut debouncer = busy();
        debouncer.on_request(PathBuf::from("/b"));
        assert_eq!(debouncer.on_request(PathBuf::from("/c")), DebounceAction::Nothing);
        assert_eq!(debouncer.pending(), Some(&PathBuf::from("/c")));
        assert_eq!(debouncer.status(), LoaderStatus::PendingSwap);
    }

    #[test]
    fn tick_waits_while_old_run_is_active() {
        let mut debouncer = busy();
        debouncer.on_request(PathBuf::from("/b"));
        assert_eq!(debouncer.on_tick(true), DebounceAction::Nothing);
        assert_eq!(debouncer.on_tick(true), DebounceAction::Nothing);
        assert_eq!(debouncer.status(), LoaderStatus::PendingSwap);
    }

    #[test]
    fn tick_after_old_run_ends_starts_latest_target() {
        let mut debouncer = busy();
        debouncer.on_request(PathBuf::from("/b"));
        debouncer.on_request(PathBuf::from("/c"));
        debouncer.on_run_finished();
        assert_eq!(debouncer.status(), LoaderStatus::PendingSwap);

        assert_eq!(
            debouncer.on_tick(false),
            DebounceAction::DisarmAndStart(PathBuf::from("/c"))
        );
        assert_eq!(debouncer.status(), LoaderStatus::Busy);
        assert_eq!(debouncer.pending(), None);
    }

    #[test]
    fn completion_returns_to_idle() {
        let mut debouncer = busy();
        debouncer.on_run_finished();
        assert_eq!(debouncer.status(), LoaderStatus::Idle);
    }

    #[test]
    fn stray_tick_disarms() {
        let mut debouncer = Debouncer::default();
        assert_eq!(debouncer.on_tick(false), DebounceAction::Disarm);
        let mut debouncer = busy();
        assert_eq!(debouncer.on_tick(true), DebounceAction::Disarm);
        assert_eq!(debouncer.status(), LoaderStatus::Busy);
    }

    #[test]
    fn abort_drops_pending_target() {
        let mut debouncer = busy();
        debouncer.on_request(PathBuf::from("/b"));
        assert_eq!(debouncer.on_abort(true), DebounceAction::CancelAndDisarm);
        assert_eq!(debouncer.status(), LoaderStatus::Busy);
        assert_eq!(debouncer.pending(), None);

        debouncer.on_run_finished();
        assert_eq!(debouncer.status(), LoaderStatus::Idle);
    }

    #[test]
    fn abort_after_old_run_ended_goes_idle() {
        let mut debouncer = busy();
        debouncer.on_request(PathBuf::from("/b"));
        debouncer.on_run_finished();
        assert_eq!(debouncer.on_abort(false), DebounceAction::CancelAndDisarm);
        assert_eq!(debouncer.status(), LoaderStatus::Idle);
    }

    #[test]
    fn abort_while_idle_does_nothing() {
        let mut debouncer = Debouncer::default();
        assert_eq!(debouncer.on_abort(false), DebounceAction::Nothing);
        let mut debouncer = busy();
        assert_eq!(debouncer.on_abort(true), DebounceAction::Cancel);
        assert_eq!(debouncer.status(), LoaderStatus::Busy);
    }

    #[test]
    fn status_serializes_camel_case() {
        assert_eq!(serde_json::to_string(&LoaderStatus::PendingSwap).unwrap(), "\"pendingSwap\"");
    }
}
