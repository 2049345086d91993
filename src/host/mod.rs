//! Seam to the host base application.
//!
//! The host owns the grid, the attachment store, and the selection model;
//! this panel only talks to it through these traits. Production embedders
//! adapt the host SDK; tests plug in in-memory fakes.

pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{AttachmentRef, FileContents};

pub use http::{AttachmentFetcher, FetchedBytes, HttpFetcher};

/// Failure reported by any host SDK call.
#[derive(Debug, Clone, Error)]
pub enum HostError {
    #[error("host api error: {0}")]
    Api(String),
    /// The host has no active table or the referenced field/record is gone.
    #[error("host object unavailable: {0}")]
    Unavailable(String),
}

/// The host's current selection. Either id may be absent, e.g. when the
/// selection was cleared or a whole row header is highlighted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selection {
    pub field_id: Option<String>,
    pub record_id: Option<String>,
}

/// Entry point into the host: table and selection lookups.
#[async_trait]
pub trait HostBase: Send + Sync {
    async fn active_table(&self) -> Result<Arc<dyn HostTable>, HostError>;
    async fn selection(&self) -> Result<Selection, HostError>;
}

/// One table in the host grid.
#[async_trait]
pub trait HostTable: Send + Sync {
    /// Resolve a field id to an attachment-capable field handle.
    async fn attachment_field(&self, field_id: &str)
        -> Result<Arc<dyn AttachmentField>, HostError>;

    /// Record ids in the table's display order (column mode walks these).
    async fn record_ids(&self) -> Result<Vec<String>, HostError>;

    /// Resolve an attachment token to a short-lived download URL.
    async fn attachment_url(&self, token: &str) -> Result<String, HostError>;
}

/// An attachment-typed field: cell reads and write-backs.
#[async_trait]
pub trait AttachmentField: Send + Sync {
    /// The raw attachment list in one cell; empty if the cell is empty.
    async fn value(&self, record_id: &str) -> Result<Vec<AttachmentRef>, HostError>;

    /// Replace one cell's attachments. `Ok(false)` means the host rejected
    /// the write without raising an API error.
    async fn set_value(
        &self,
        record_id: &str,
        files: Vec<FileContents>,
    ) -> Result<bool, HostError>;
}
