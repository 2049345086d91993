use serde::{Deserialize, Serialize};

/// Scope of a fetch: one record's cell, or every record in the field.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FetchMode {
    Cell,
    Column,
}

impl Default for FetchMode {
    fn default() -> Self {
        FetchMode::Cell
    }
}

/// The selection a single pipeline run operates on. Derived anew from the
/// host's current selection at trigger time; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionContext {
    pub field_id: String,
    pub record_id: String,
    pub mode: FetchMode,
}
