//! Directory loader: turns "show this directory" requests into pipeline runs, one at a time.
//!
//! A request while a run is in flight cancels that run and waits for it to wind down before
//! starting the next one. Requests arriving during the wait only replace the target, so a burst
//! of navigation ends up loading just the last directory.

mod debounce;

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ViewConfig;
use crate::file_system::{FileSystemProvider, LocalFileSystem};
use crate::icons::{IconProvider, ThumbnailIconProvider};
use crate::ignore_poison::IgnorePoison;
use crate::listing::RowIdAllocator;
use crate::pipeline::{CancellationToken, RunContext, RunId, RunReport, run_pipeline};
use crate::surface::SurfaceSender;

use debounce::{DebounceAction, Debouncer};

pub use debounce::LoaderStatus;

/// Mutable controller state. Every transition happens under one lock.
#[derive(Default)]
struct ControllerState {
    debounce: Debouncer,
    /// Token of the most recently started run.
    token: Option<CancellationToken>,
    /// Set from run start until its worker has returned.
    active_run: Option<RunId>,
    timer: Option<ArmedTimer>,
    /// Bumped each time a timer is armed.
    timer_generation: u64,
}

struct ArmedTimer {
    generation: u64,
    handle: JoinHandle<()>,
}

struct LoaderInner {
    fs: Arc<dyn FileSystemProvider>,
    icons: Arc<dyn IconProvider>,
    surface: SurfaceSender,
    config: ViewConfig,
    runtime: Handle,
    state: Mutex<ControllerState>,
    next_run: AtomicU64,
    row_ids: Arc<RowIdAllocator>,
    status: watch::Sender<LoaderStatus>,
    last_report: Mutex<Option<RunReport>>,
}

/// Handle to a loader. Clones share the same state.
#[derive(Clone)]
pub struct DirectoryLoader {
    inner: Arc<LoaderInner>,
}

impl DirectoryLoader {
    /// Creates a loader that spawns its work on the current Tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime. Use [`Self::with_runtime`] there.
    pub fn new(
        fs: Arc<dyn FileSystemProvider>,
        icons: Arc<dyn IconProvider>,
        surface: SurfaceSender,
        config: ViewConfig,
    ) -> Self {
        Self::with_runtime(fs, icons, surface, config, Handle::current())
    }

    pub fn with_runtime(
        fs: Arc<dyn FileSystemProvider>,
        icons: Arc<dyn IconProvider>,
        surface: SurfaceSender,
        config: ViewConfig,
        runtime: Handle,
    ) -> Self {
        let (status, _) = watch::channel(LoaderStatus::Idle);
        Self {
            inner: Arc::new(LoaderInner {
                fs,
                icons,
                surface,
                config,
                runtime,
                state: Mutex::new(ControllerState::default()),
                next_run: AtomicU64::new(0),
                row_ids: Arc::new(RowIdAllocator::new()),
                status,
                last_report: Mutex::new(None),
            }),
        }
    }

    /// Loader over the local disk, with image thumbnails sized per `config`.
    pub fn local(surface: SurfaceSender, config: ViewConfig) -> Self {
        let icons = ThumbnailIconProvider::new(config.large_icon_size, config.small_icon_size);
        Self::new(Arc::new(LocalFileSystem::new()), Arc::new(icons), surface, config)
    }

    /// Requests that `directory` be shown. Returns immediately.
    pub fn show_directory(&self, directory: impl AsRef<Path>) {
        let directory = directory.as_ref().to_path_buf();
        log::debug!("Show directory requested: {}", directory.display());
        let mut state = self.inner.state.lock_ignore_poison();
        let action = state.debounce.on_request(directory);
        self.inner.perform(&mut state, action);
    }

    /// Stops the current load and forgets any directory waiting behind it. Rows already shown
    /// stay; the surface isn't reset.
    pub fn abort_loading(&self) {
        let mut state = self.inner.state.lock_ignore_poison();
        let run_active = state.active_run.is_some();
        let action = state.debounce.on_abort(run_active);
        log::debug!("Abort requested in {:?}", state.debounce.status());
        self.inner.perform(&mut state, action);
    }

    pub fn status(&self) -> LoaderStatus {
        *self.inner.status.borrow()
    }

    /// True until the loader is back to idle.
    pub fn is_busy(&self) -> bool {
        self.status() != LoaderStatus::Idle
    }

    /// Directory waiting for the cancelled run to end, if any.
    pub fn pending_directory(&self) -> Option<PathBuf> {
        self.inner.state.lock_ignore_poison().debounce.pending().cloned()
    }

    /// Receives every status transition.
    pub fn subscribe(&self) -> watch::Receiver<LoaderStatus> {
        self.inner.status.subscribe()
    }

    /// Resolves once no run is in flight and nothing is waiting.
    pub async fn wait_until_idle(&self) {
        let mut status = self.subscribe();
        // The sender lives in `inner`, which `self` keeps alive.
        let _ = status.wait_for(|s| *s == LoaderStatus::Idle).await;
    }

    /// Report of the most recently finished run.
    pub fn last_report(&self) -> Option<RunReport> {
        self.inner.last_report.lock_ignore_poison().clone()
    }

    pub fn config(&self) -> &ViewConfig {
        &self.inner.config
    }
}

impl LoaderInner {
    fn perform(self: &Arc<Self>, state: &mut ControllerState, action: DebounceAction) {
        match action {
            DebounceAction::Nothing => {}
            DebounceAction::Start(directory) => self.start_run(state, directory),
            DebounceAction::CancelAndArm => {
                cancel(state);
                self.arm_timer(state);
            }
            DebounceAction::DisarmAndStart(directory) => {
                disarm(state);
                self.start_run(state, directory);
            }
            DebounceAction::Cancel => cancel(state),
            DebounceAction::CancelAndDisarm => {
                cancel(state);
                disarm(state);
            }
            DebounceAction::Disarm => disarm(state),
        }
        self.status.send_replace(state.debounce.status());
    }

    fn start_run(self: &Arc<Self>, state: &mut ControllerState, directory: PathBuf) {
        let run_id = RunId(self.next_run.fetch_add(1, Ordering::Relaxed) + 1);
        let token = CancellationToken::new();
        state.token = Some(token.clone());
        state.active_run = Some(run_id);
        log::info!("[{}] Starting load of {}", run_id, directory.display());

        let ctx = RunContext {
            run_id,
            directory: directory.clone(),
            token,
            fs: Arc::clone(&self.fs),
            icons: Arc::clone(&self.icons),
            surface: self.surface.clone(),
            row_ids: Arc::clone(&self.row_ids),
            show_hidden: self.config.show_hidden,
        };

        let inner = Arc::clone(self);
        self.runtime.spawn(async move {
            // Run blocking I/O and decoding on the dedicated thread pool
            let result = tokio::task::spawn_blocking(move || run_pipeline(&ctx)).await;
            let report = match result {
                Ok(report) => report,
                Err(e) => {
                    log::error!("[{}] Load task failed: {}", run_id, e);
                    RunReport::failed(run_id, directory, format!("Task failed: {}", e))
                }
            };
            inner.finish_run(report);
        });
    }

    fn finish_run(&self, report: RunReport) {
        let mut state = self.state.lock_ignore_poison();
        if state.active_run == Some(report.run_id) {
            state.active_run = None;
            state.debounce.on_run_finished();
        }
        log::info!(
            "[{}] Load of {} ended: {:?}",
            report.run_id,
            report.directory.display(),
            report.outcome
        );
        *self.last_report.lock_ignore_poison() = Some(report);
        self.status.send_replace(state.debounce.status());
    }

    fn arm_timer(self: &Arc<Self>, state: &mut ControllerState) {
        if state.timer.is_some() {
            return;
        }
        state.timer_generation += 1;
        let generation = state.timer_generation;
        let period = self.config.poll_interval;
        let weak: Weak<Self> = Arc::downgrade(self);
        let handle = self.runtime.spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // The first tick completes immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if !inner.on_tick(generation) {
                    break;
                }
            }
        });
        state.timer = Some(ArmedTimer { generation, handle });
    }

    /// Returns whether the timer of `generation` should stay armed. A tick from a timer that has
    /// since been disarmed or replaced changes nothing.
    fn on_tick(self: &Arc<Self>, generation: u64) -> bool {
        let mut state = self.state.lock_ignore_poison();
        if state.timer.as_ref().map(|t| t.generation) != Some(generation) {
            log::trace!("Ignoring tick from stale timer {}", generation);
            return false;
        }
        let run_active = state.active_run.is_some();
        let action = state.debounce.on_tick(run_active);
        let keep_armed = action == DebounceAction::Nothing;
        if !keep_armed {
            // Called from the timer task itself, which exits once this returns false.
            state.timer = None;
        }
        if let DebounceAction::DisarmAndStart(directory) = &action {
            log::debug!("Previous run stopped, switching to {}", directory.display());
        }
        self.perform(&mut state, action);
        keep_armed
    }
}

fn cancel(state: &ControllerState) {
    if let Some(token) = &state.token {
        token.request_cancel();
    }
}

fn disarm(state: &mut ControllerState) {
    if let Some(timer) = state.timer.take() {
        timer.handle.abort();
    }
}
