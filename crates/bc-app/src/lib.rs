//! blockclip Application Orchestration Layer
//!
//! This crate contains the clipboard pipeline: adapter registry, middleware
//! chain, paste target resolution and the copy / cut / paste use cases.
//!
//! ```text
//! UI event
//!   ↓
//! ClipboardOrchestrator
//!   ↓
//! SelectionResolver ─→ AdapterRegistry ─→ MiddlewareChain
//!   ↓
//! DocumentPort mutation (one undo step)
//! ```

pub mod adapter_registry;
pub mod deps;
pub mod disposable;
pub mod middleware_chain;
pub mod usecases;

pub use adapter_registry::{AdapterRegistration, AdapterRegistry, DecodedSlice};
pub use deps::ClipboardDeps;
pub use disposable::{Disposable, DisposableGroup};
pub use middleware_chain::MiddlewareChain;
pub use usecases::clipboard::{
    ClipboardEvent, ClipboardOrchestrator, ClipboardOutcome, CopyReport, PasteReport,
};
