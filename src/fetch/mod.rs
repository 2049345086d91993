pub mod materializer;
pub mod pipeline;

pub use pipeline::{run_fetch, FetchOutcome};
