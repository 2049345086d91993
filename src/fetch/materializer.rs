use std::sync::Arc;

use chrono::Utc;

use crate::error::PanelError;
use crate::host::{AttachmentFetcher, AttachmentField, HostTable};
use crate::models::{ImageItem, RecordImageGroup};

/// Materialize one record's cell: filter to image attachments, resolve each
/// token to a download URL, pull the bytes, and wrap them as `ImageItem`s.
///
/// Fails fast: the first failed download aborts this record's resolution,
/// which the pipeline join turns into a whole-batch abort. The returned
/// group may be empty; the pipeline drops empty groups before publishing.
pub async fn materialize_record(
    table: &Arc<dyn HostTable>,
    field: &Arc<dyn AttachmentField>,
    fetcher: &Arc<dyn AttachmentFetcher>,
    field_id: &str,
    record_id: &str,
) -> Result<RecordImageGroup, PanelError> {
    let refs = field.value(record_id).await?;

    let mut images = Vec::new();
    for source in refs {
        if !source.is_image() {
            continue;
        }

        let url = table.attachment_url(&source.token).await?;
        let fetched = fetcher.fetch_bytes(&url).await?;

        // Trust the download's content type when present; the host's
        // declared mime is the fallback.
        let mime = fetched
            .mime
            .clone()
            .unwrap_or_else(|| source.mime_type.clone());

        images.push(ImageItem {
            source,
            url,
            bytes: fetched.bytes,
            mime,
            captured_at: Utc::now(),
        });
    }

    Ok(RecordImageGroup {
        record_id: record_id.to_string(),
        field_id: field_id.to_string(),
        images,
    })
}
