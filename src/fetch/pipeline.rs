use std::sync::Arc;

use futures::future::try_join_all;

use crate::error::PanelError;
use crate::host::{AttachmentFetcher, AttachmentField, HostBase};
use crate::models::{FetchMode, RecordImageGroup, SelectionContext};

// Set to false to silence this module's diagnostics
const ENABLE_LOGS: bool = true;

use crate::{log_info, log_warn};

/// Everything one completed fetch hands back to the controller: the new
/// working set plus the field handle the later apply stage writes through.
pub struct FetchOutcome {
    pub groups: Vec<RecordImageGroup>,
    pub field: Arc<dyn AttachmentField>,
}

/// Run one fetch for the given selection. The caller holds the guard; this
/// function only resolves, fans out, joins, and filters.
///
/// Any failure resolving the table or field maps to `SelectionUnavailable`,
/// which the controller answers by clearing the working set.
pub async fn run_fetch(
    host: &Arc<dyn HostBase>,
    fetcher: &Arc<dyn AttachmentFetcher>,
    ctx: &SelectionContext,
) -> Result<FetchOutcome, PanelError> {
    let table = host
        .active_table()
        .await
        .map_err(|err| {
            log_warn!("no active table for fetch: {err}");
            PanelError::SelectionUnavailable
        })?;

    let field = table
        .attachment_field(&ctx.field_id)
        .await
        .map_err(|err| {
            log_warn!("field {} unavailable: {err}", ctx.field_id);
            PanelError::SelectionUnavailable
        })?;

    let record_ids = match ctx.mode {
        FetchMode::Cell => vec![ctx.record_id.clone()],
        FetchMode::Column => table.record_ids().await?,
    };

    // Fan out per record and join before publishing; total latency is
    // bounded by the slowest record, not the sum. try_join_all aborts the
    // whole batch on the first record failure.
    let groups = try_join_all(record_ids.iter().map(|record_id| {
        super::materializer::materialize_record(&table, &field, fetcher, &ctx.field_id, record_id)
    }))
    .await?;

    let groups: Vec<RecordImageGroup> = groups
        .into_iter()
        .filter(|group| !group.images.is_empty())
        .collect();

    log_info!(
        "fetch completed for field {}: {} group(s), {} image(s)",
        ctx.field_id,
        groups.len(),
        groups.iter().map(|g| g.images.len()).sum::<usize>()
    );

    Ok(FetchOutcome { groups, field })
}
