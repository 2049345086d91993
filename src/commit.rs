//! The apply stage: write the (possibly compressed) working set back to the
//! host, one record at a time, and fold per-record results into a single
//! user-visible outcome.

use std::sync::Arc;

use log::{info, warn};
use serde::Serialize;

use crate::host::AttachmentField;
use crate::models::{FileContents, RecordImageGroup};

/// Aggregate result of one apply pass. `success` is true only when every
/// record's write succeeded; there is no partial-success state and no
/// rollback of records that did succeed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub success: bool,
    pub records_written: usize,
    pub records_failed: usize,
}

/// Write every group back through the field. Writes are sequential to keep
/// load on the host API low; a failed write marks its record and the pass
/// continues with the rest.
pub async fn apply_working_set(
    field: &Arc<dyn AttachmentField>,
    groups: &[RecordImageGroup],
) -> ApplyOutcome {
    let mut records_failed = 0;

    for group in groups {
        let files: Vec<FileContents> = group.images.iter().map(FileContents::from).collect();

        let written = match field.set_value(&group.record_id, files).await {
            Ok(ok) => ok,
            Err(err) => {
                warn!("write failed for record {}: {err}", group.record_id);
                false
            }
        };

        if !written {
            records_failed += 1;
        }
    }

    let outcome = ApplyOutcome {
        success: records_failed == 0,
        records_written: groups.len() - records_failed,
        records_failed,
    };

    info!(
        "apply finished: {}/{} record(s) written",
        outcome.records_written,
        groups.len()
    );

    outcome
}
