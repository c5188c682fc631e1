//! Stage 2: one placeholder row per directory child.

use super::RunContext;
use crate::file_system::ProviderError;
use crate::listing::{Row, RowIndex};
use crate::surface::SurfaceCommand;

/// What the populate stage hands to the icon stage.
#[derive(Debug, Default)]
pub(super) struct PopulateOutput {
    /// Rows created, in enumeration order.
    pub index: RowIndex,
    pub cancelled: bool,
    /// Children the provider couldn't name at all.
    pub skipped: usize,
}

/// Enumerates the directory and queues a row per child, checking the token before pulling
/// each child and again before publishing its row. A closed surface ends the stage like a
/// cancellation.
///
/// Returns `Err` only when the directory itself can't be listed.
pub(super) fn run(ctx: &RunContext) -> Result<PopulateOutput, ProviderError> {
    let mut output = PopulateOutput::default();

    if ctx.token.is_cancelled() {
        output.cancelled = true;
        return Ok(output);
    }

    let mut children = ctx.fs.list_children(&ctx.directory)?;

    loop {
        if ctx.token.is_cancelled() {
            output.cancelled = true;
            break;
        }
        let Some(child) = children.next() else {
            break;
        };
        let entry = match child {
            Ok(entry) => entry,
            Err(e) => {
                log::debug!("[{}] Skipping unreadable child of {}: {}", ctx.run_id, ctx.directory.display(), e);
                output.skipped += 1;
                continue;
            }
        };
        if !ctx.show_hidden && entry.is_hidden() {
            continue;
        }
        if ctx.token.is_cancelled() {
            output.cancelled = true;
            break;
        }

        let row = Row::placeholder(ctx.row_ids.allocate(), &entry);
        let id = row.id;
        let sent = ctx.surface.send(SurfaceCommand::AddRow {
            run: ctx.run_id,
            row,
            entry: entry.clone(),
        });
        if !sent {
            log::debug!("[{}] Populate: surface is gone, stopping", ctx.run_id);
            output.cancelled = true;
            break;
        }
        output.index.insert(id, entry);
    }

    log::debug!(
        "[{}] Populate: {} rows from {}, {} unreadable{}",
        ctx.run_id,
        output.index.len(),
        ctx.directory.display(),
        output.skipped,
        if output.cancelled { " (cancelled)" } else { "" }
    );
    Ok(output)
}
