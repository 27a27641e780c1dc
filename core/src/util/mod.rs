mod preview;

pub use preview::{preview_bytes, preview_text};
