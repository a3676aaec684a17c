//! Middleware Chain
//!
//! Ordered transforms around copy and paste. Insertion order is execution
//! order; removal is by identity (the same `Arc` that was added).

use std::sync::{Arc, RwLock, Weak};

use tracing::{debug, warn};

use bc_core::ports::ClipboardMiddlewarePort;
use bc_core::{ClipboardError, SliceSnapshot};

use crate::disposable::Disposable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Copy,
    Paste,
}

#[derive(Default)]
pub struct MiddlewareChain {
    entries: RwLock<Vec<Arc<dyn ClipboardMiddlewarePort>>>,
}

/// Identity comparison on the data pointer; vtable pointers of the same
/// object may differ between codegen units.
fn same_middleware(a: &Arc<dyn ClipboardMiddlewarePort>, b: &Arc<dyn ClipboardMiddlewarePort>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `middleware`; the handle removes it again by identity.
    pub fn use_middleware(self: &Arc<Self>, middleware: Arc<dyn ClipboardMiddlewarePort>) -> Disposable {
        debug!(middleware = middleware.name(), "Adding clipboard middleware");
        self.entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Arc::clone(&middleware));

        let chain: Weak<Self> = Arc::downgrade(self);
        Disposable::new(move || {
            if let Some(chain) = chain.upgrade() {
                chain.unuse(&middleware);
            }
        })
    }

    /// Remove every entry that is `middleware`; no-op when absent.
    pub fn unuse(&self, middleware: &Arc<dyn ClipboardMiddlewarePort>) {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let before = entries.len();
        entries.retain(|entry| !same_middleware(entry, middleware));
        if entries.len() != before {
            debug!(middleware = middleware.name(), "Removed clipboard middleware");
        }
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn names(&self) -> Vec<String> {
        self.snapshot()
            .iter()
            .map(|middleware| middleware.name().to_string())
            .collect()
    }

    /// Run every `on_copy` hook in order.
    pub fn run_copy(&self, slice: SliceSnapshot) -> Result<SliceSnapshot, ClipboardError> {
        self.run(slice, Direction::Copy)
    }

    /// Run every `on_paste` hook in order.
    pub fn run_paste(&self, slice: SliceSnapshot) -> Result<SliceSnapshot, ClipboardError> {
        self.run(slice, Direction::Paste)
    }

    /// The slice is moved through the chain and only handed back when every
    /// hook succeeded; on failure the half-transformed slice is dropped.
    fn run(&self, mut slice: SliceSnapshot, direction: Direction) -> Result<SliceSnapshot, ClipboardError> {
        for middleware in self.snapshot() {
            let result = match direction {
                Direction::Copy => middleware.on_copy(&mut slice),
                Direction::Paste => middleware.on_paste(&mut slice),
            };
            if let Err(err) = result {
                warn!(middleware = middleware.name(), ?direction, error = %err, "Middleware failed, aborting chain");
                return Err(ClipboardError::MiddlewareFailure {
                    middleware: middleware.name().to_string(),
                    reason: format!("{err:#}"),
                });
            }
        }
        Ok(slice)
    }

    fn snapshot(&self) -> Vec<Arc<dyn ClipboardMiddlewarePort>> {
        self.entries
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}
