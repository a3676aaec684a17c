//! # bc-core
//!
//! Core domain models and ports for the blockclip clipboard pipeline.
//!
//! This crate contains pure domain types without any infrastructure dependencies.

pub mod block;
pub mod clipboard;
pub mod config;
pub mod ids;
pub mod ports;
pub mod selection;

// Re-export commonly used types at the crate root
pub use block::{BlockSnapshot, DocMeta, SliceSnapshot};
pub use clipboard::{ClipboardData, ClipboardError, ClipboardItem, ClipboardPayload, MimeType};
pub use config::ClipboardConfig;
pub use ids::{BlobId, BlockId, DocId, WorkspaceId};
pub use selection::{
    BlockSelection, ImageSelection, SelectionSnapshot, SelectionState, TextPoint, TextSelection,
};
