//! Ports: the seams between the clipboard pipeline and its collaborators.
//!
//! Port traits live in the domain crate; infrastructure and tests provide the
//! implementations.

pub mod clipboard;
mod blob_store;
mod doc_meta;
mod document;
mod id_generator;
mod selection_state;

pub use blob_store::BlobStorePort;
pub use clipboard::{
    AdapterContext, ClipboardAdapterPort, ClipboardMiddlewarePort, SystemClipboardPort,
};
pub use doc_meta::DocMetaPort;
pub use document::DocumentPort;
pub use id_generator::IdGeneratorPort;
pub use selection_state::SelectionStatePort;
