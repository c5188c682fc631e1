//! Stage 3: decode icons row by row and attach them as they arrive.

use super::RunContext;
use crate::file_system::FsEntry;
use crate::icons::{Icon, IconError};
use crate::listing::RowIndex;
use crate::surface::SurfaceCommand;

#[derive(Debug, Default)]
pub(super) struct IconLoadOutput {
    pub loaded: usize,
    pub failed: usize,
    pub cancelled: bool,
}

/// Walks the rows in creation order. A failed decode leaves that row without icons and moves
/// on. A cancelled token or a closed surface stops the walk at the next row boundary.
pub(super) fn run(ctx: &RunContext, index: &RowIndex) -> IconLoadOutput {
    let mut output = IconLoadOutput::default();

    for (id, entry) in index.iter() {
        if ctx.token.is_cancelled() || ctx.surface.is_closed() {
            output.cancelled = true;
            break;
        }

        match load_pair(ctx, entry) {
            Ok((large, small)) => {
                // The decode may have taken a while; don't publish into a superseded run.
                if ctx.token.is_cancelled() {
                    output.cancelled = true;
                    break;
                }
                let sent = ctx.surface.send(SurfaceCommand::SetIcons {
                    run: ctx.run_id,
                    id,
                    large,
                    small,
                });
                if !sent {
                    log::debug!("[{}] Icon load: surface is gone, stopping", ctx.run_id);
                    output.cancelled = true;
                    break;
                }
                output.loaded += 1;
            }
            Err(e) => {
                log::debug!("[{}] No icon for {}: {}", ctx.run_id, entry.path.display(), e);
                output.failed += 1;
            }
        }
    }

    log::debug!(
        "[{}] Icon load: {} loaded, {} failed{}",
        ctx.run_id,
        output.loaded,
        output.failed,
        if output.cancelled { " (cancelled)" } else { "" }
    );
    output
}

fn load_pair(ctx: &RunContext, entry: &FsEntry) -> Result<(Icon, Icon), IconError> {
    let large = ctx.icons.load_large_icon(entry)?;
    let small = ctx.icons.load_small_icon(entry)?;
    Ok((large, small))
}
