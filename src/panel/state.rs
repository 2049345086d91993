use serde::Serialize;

use crate::models::{FetchMode, RecordImageGroup};
use crate::utils::format_file_size;

/// What the panel is currently busy with. Doubles as the fetch guard: a
/// stage only starts from `Idle`, and a trigger that finds any other status
/// is dropped, never queued.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PanelStatus {
    Idle,
    Fetching,
    Compressing,
    Applying,
}

impl Default for PanelStatus {
    fn default() -> Self {
        PanelStatus::Idle
    }
}

/// Mutable panel state behind the controller's single mutex.
///
/// The working set (`groups`) is only ever replaced wholesale: by a
/// completed fetch or by a completed compression pass.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub status: PanelStatus,
    pub mode: FetchMode,
    /// User-facing compression strength, 1..=100, higher = smaller output.
    pub intensity: u8,
    pub groups: Vec<RecordImageGroup>,
    /// Field id of the last completed fetch; column mode suppresses
    /// re-triggers on the same field.
    pub last_fetched_field: Option<String>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            status: PanelStatus::Idle,
            mode: FetchMode::Cell,
            intensity: 10,
            groups: Vec::new(),
            last_fetched_field: None,
        }
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PanelSnapshot {
        PanelSnapshot {
            status: self.status,
            loading: self.status != PanelStatus::Idle,
            mode: self.mode,
            intensity: self.intensity,
            groups: self.groups.iter().map(GroupPreview::from).collect(),
        }
    }
}

/// What the embedding UI observes: loading flag, mode, intensity, and
/// enough of the working set to render previews.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PanelSnapshot {
    pub status: PanelStatus,
    pub loading: bool,
    pub mode: FetchMode,
    pub intensity: u8,
    pub groups: Vec<GroupPreview>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GroupPreview {
    pub record_id: String,
    pub images: Vec<ImagePreview>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ImagePreview {
    pub name: String,
    pub url: String,
    pub byte_size: u64,
    pub size_label: String,
}

impl From<&RecordImageGroup> for GroupPreview {
    fn from(group: &RecordImageGroup) -> Self {
        Self {
            record_id: group.record_id.clone(),
            images: group
                .images
                .iter()
                .map(|item| ImagePreview {
                    name: item.source.name.clone(),
                    url: item.url.clone(),
                    byte_size: item.bytes.len() as u64,
                    size_label: format_file_size(item.bytes.len() as u64),
                })
                .collect(),
        }
    }
}
