use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An attachment descriptor exactly as it exists in the host's store.
/// Read-only to this panel; `token` is unique within one field's set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentRef {
    pub token: String,
    pub name: String,
    pub size: u64,
    pub mime_type: String,
}

impl AttachmentRef {
    /// Only attachments with an `image/*` mime type ever enter the working set.
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

/// One materialized attachment held in memory.
///
/// `mime` tracks the type of the *current* `bytes`: the download's
/// content type on fetch, replaced by the codec's output type after a
/// compression pass. `source.mime_type` keeps the host's original claim.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageItem {
    pub source: AttachmentRef,
    pub url: String,
    pub bytes: Vec<u8>,
    pub mime: String,
    pub captured_at: DateTime<Utc>,
}

/// All qualifying images for one record in the selected field.
/// Invariant: `images` is non-empty; empty groups are dropped before the
/// working set is published.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordImageGroup {
    pub record_id: String,
    pub field_id: String,
    pub images: Vec<ImageItem>,
}

/// Payload shape for writing an attachment cell back through the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContents {
    pub name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl From<&ImageItem> for FileContents {
    fn from(item: &ImageItem) -> Self {
        Self {
            name: item.source.name.clone(),
            mime: item.mime.clone(),
            bytes: item.bytes.clone(),
        }
    }
}
