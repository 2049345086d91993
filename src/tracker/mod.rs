pub mod controller;
pub mod loop_worker;

pub use controller::SelectionTracker;
pub use loop_worker::QUIET_WINDOW_MS;
