//! # bc-infra
//!
//! Concrete implementations of the `bc-core` ports: clipboard format
//! adapters, clipboard middlewares, an in-memory document with undo/redo,
//! an in-memory system clipboard, a content-addressed blob store, a uuid
//! block id generator and the TOML config loader.

pub mod adapters;
pub mod blob;
pub mod clipboard;
pub mod config;
pub mod document;
pub mod id;
pub mod middleware;

pub use blob::MemoryBlobStore;
pub use clipboard::{InMemorySystemClipboard, MemorySelectionState};
pub use document::{MemoryDocMetas, MemoryDocument};
pub use id::UuidIdGenerator;
