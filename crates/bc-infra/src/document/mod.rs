//! In-memory block document.

mod doc_metas;
mod memory_document;
mod tree;
mod undo_stack;

pub use doc_metas::MemoryDocMetas;
pub use memory_document::MemoryDocument;
pub use undo_stack::UndoStack;
