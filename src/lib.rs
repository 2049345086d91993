//! Panel core of an image-attachment compression extension for base-style
//! spreadsheet apps.
//!
//! The host application owns the grid, attachment storage, and selection
//! model; this crate reacts to selection pings, materializes the selected
//! cell's (or column's) image attachments into an in-memory working set,
//! applies a lossy compression pass on demand, and writes the result back
//! through the host's field API.
//!
//! Wiring, in embedder terms:
//!
//! ```no_run
//! # async fn wire() -> anyhow::Result<()> {
//! # let host: std::sync::Arc<dyn cellpress::HostBase> = unimplemented!();
//! use std::sync::Arc;
//! use cellpress::{HttpFetcher, PanelController, SelectionTracker};
//!
//! let controller = PanelController::new(host, Arc::new(HttpFetcher::new()));
//! let mut tracker = SelectionTracker::new();
//! let pings = tracker.start(controller.clone())?;
//! // bridge the host's onSelectionChange to `pings.send(()).await`
//! # Ok(())
//! # }
//! ```

mod commit;
mod compress;
mod error;
mod fetch;
mod host;
mod models;
mod panel;
mod tracker;
mod utils;

pub use commit::ApplyOutcome;
pub use compress::{compress_image, CompressedImage, CompressionOptions};
pub use error::PanelError;
pub use host::{
    AttachmentFetcher, AttachmentField, FetchedBytes, HostBase, HostError, HostTable,
    HttpFetcher, Selection,
};
pub use models::{AttachmentRef, FetchMode, FileContents, ImageItem, RecordImageGroup};
pub use panel::{GroupPreview, ImagePreview, PanelController, PanelSnapshot, PanelStatus};
pub use tracker::{SelectionTracker, QUIET_WINDOW_MS};
pub use utils::format_file_size;
