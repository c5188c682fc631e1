//! The loading pipeline: Reset, then Populate, then Icon Load, for one directory.
//!
//! A run is plain sequential code executed on a blocking worker thread. Each stage returns
//! before the next begins, and all of them observe the same [`CancellationToken`] at
//! per-entry checkpoints. Stages reach the surface only through [`SurfaceSender`].

mod cancellation;
mod icon_load;
mod populate;
mod reset;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::file_system::FileSystemProvider;
use crate::icons::IconProvider;
use crate::listing::RowIdAllocator;
use crate::surface::SurfaceSender;

pub use cancellation::CancellationToken;

/// Identity of one run. Later runs have larger ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PipelineStage {
    Reset,
    Populate,
    IconLoad,
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum RunOutcome {
    /// Every row was created and every icon attempted.
    Completed,
    /// Superseded; `stage` is where the cancellation was first observed.
    Cancelled { stage: PipelineStage },
    /// The directory couldn't be listed. The surface stays empty.
    Failed { message: String },
}

/// Summary of a finished run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub run_id: RunId,
    pub directory: PathBuf,
    pub outcome: RunOutcome,
    pub rows_created: usize,
    pub icons_loaded: usize,
    pub icon_failures: usize,
    pub elapsed: Duration,
}

impl RunReport {
    fn new(run_id: RunId, directory: PathBuf) -> Self {
        Self {
            run_id,
            directory,
            outcome: RunOutcome::Completed,
            rows_created: 0,
            icons_loaded: 0,
            icon_failures: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Report for a run whose worker died before it could produce its own.
    pub(crate) fn failed(run_id: RunId, directory: PathBuf, message: String) -> Self {
        Self {
            outcome: RunOutcome::Failed { message },
            ..Self::new(run_id, directory)
        }
    }
}

/// Everything one run needs. Built by the controller, moved onto the worker thread.
pub struct RunContext {
    pub run_id: RunId,
    pub directory: PathBuf,
    pub token: CancellationToken,
    pub fs: Arc<dyn FileSystemProvider>,
    pub icons: Arc<dyn IconProvider>,
    pub surface: SurfaceSender,
    pub row_ids: Arc<RowIdAllocator>,
    pub show_hidden: bool,
}

/// Runs the three stages in order and reports how far it got. Blocking.
pub fn run_pipeline(ctx: &RunContext) -> RunReport {
    let started = Instant::now();
    let mut report = RunReport::new(ctx.run_id, ctx.directory.clone());
    log::debug!("[{}] Loading {}", ctx.run_id, ctx.directory.display());

    if !reset::run(ctx) {
        report.outcome = RunOutcome::Cancelled {
            stage: PipelineStage::Reset,
        };
        report.elapsed = started.elapsed();
        return report;
    }

    let populated = match populate::run(ctx) {
        Ok(populated) => populated,
        Err(e) => {
            log::warn!("[{}] Couldn't list {}: {}", ctx.run_id, ctx.directory.display(), e);
            report.outcome = RunOutcome::Failed { message: e.to_string() };
            report.elapsed = started.elapsed();
            return report;
        }
    };
    report.rows_created = populated.index.len();
    if populated.cancelled {
        report.outcome = RunOutcome::Cancelled {
            stage: PipelineStage::Populate,
        };
    }

    // Runs even after a cancelled populate: it sees the token at its first checkpoint and
    // returns, which is what makes every run reach a terminal state.
    let icons = icon_load::run(ctx, &populated.index);
    report.icons_loaded = icons.loaded;
    report.icon_failures = icons.failed;
    if icons.cancelled && report.outcome == RunOutcome::Completed {
        report.outcome = RunOutcome::Cancelled {
            stage: PipelineStage::IconLoad,
        };
    }

    report.elapsed = started.elapsed();
    log::debug!(
        "[{}] Finished {}: {:?}, {} rows, {} icons, {} icon failures, {}ms",
        ctx.run_id,
        ctx.directory.display(),
        report.outcome,
        report.rows_created,
        report.icons_loaded,
        report.icon_failures,
        report.elapsed.as_millis()
    );
    report
}
