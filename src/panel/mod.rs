pub mod controller;
pub mod state;

pub use controller::PanelController;
pub use state::{GroupPreview, ImagePreview, PanelSnapshot, PanelState, PanelStatus};
