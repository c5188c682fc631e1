//! Stage 1: empty the surface for the new run.

use super::RunContext;
use crate::surface::SurfaceCommand;

/// Queues the reset. Returns false if the run was cancelled before it got this far, or if the
/// surface owner has gone away.
///
/// The command channel is FIFO, so the surface owner applies the reset before any row this
/// run adds. Resetting an already empty surface is a no-op on the owner side.
pub(super) fn run(ctx: &RunContext) -> bool {
    if ctx.token.is_cancelled() {
        log::debug!("[{}] Reset: cancelled before start", ctx.run_id);
        return false;
    }
    if !ctx.surface.send(SurfaceCommand::Reset { run: ctx.run_id }) {
        log::debug!("[{}] Reset: surface is gone, stopping", ctx.run_id);
        return false;
    }
    true
}
