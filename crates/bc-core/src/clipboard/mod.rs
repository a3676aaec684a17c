//! Clipboard domain models.
mod content;
mod error;
mod mime;
pub mod meta_keys;

pub use content::{ClipboardData, ClipboardItem, ClipboardPayload};
pub use error::ClipboardError;
pub use mime::{MimeType, IMAGE_MIME_TYPES};
