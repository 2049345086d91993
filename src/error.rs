use thiserror::Error;

use crate::host::HostError;

/// Failures that can surface from the panel's async stages.
///
/// Every stage catches these at its own boundary: the guard is released and
/// the loading flag reset on all paths, so no failure can strand the panel
/// in a loading state.
#[derive(Debug, Error)]
pub enum PanelError {
    /// The host reported no usable table/field/selection. Recovered locally
    /// by clearing the working set; never shown to the user.
    #[error("no usable selection available from the host")]
    SelectionUnavailable,

    /// An attachment byte download failed. Aborts the whole fetch run.
    #[error("attachment download failed for {url}: {reason}")]
    NetworkFetch { url: String, reason: String },

    /// The image codec failed while compressing one attachment. Aborts the
    /// whole compression pass; the pre-pass working set stays visible.
    #[error("image codec failed for {name}: {source}")]
    Codec {
        name: String,
        #[source]
        source: image::ImageError,
    },

    #[error("host call failed: {0}")]
    Host(#[from] HostError),
}
