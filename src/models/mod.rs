pub mod attachment;
pub mod context;

pub use attachment::{AttachmentRef, FileContents, ImageItem, RecordImageGroup};
pub use context::{FetchMode, SelectionContext};
