//! Format Adapter Registry
//!
//! MIME type → adapter, ordered by priority.
//!
//! # Lookup order / 查找顺序
//! - priority: desc
//! - registration sequence: desc (most recent registration wins a tie)
//!
//! Lookups clone the registrations out of the lock before awaiting any
//! adapter, so unregistering during an in-flight copy / paste does not affect
//! that operation.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, Weak};

use tracing::{debug, warn};

use bc_core::clipboard::{meta_keys, ClipboardError, ClipboardItem, ClipboardPayload, MimeType};
use bc_core::ports::{AdapterContext, ClipboardAdapterPort};
use bc_core::SliceSnapshot;

use crate::disposable::Disposable;

#[derive(Clone)]
pub struct AdapterRegistration {
    pub mime: MimeType,
    pub adapter: Arc<dyn ClipboardAdapterPort>,
    pub priority: i32,
    seq: u64,
}

impl std::fmt::Debug for AdapterRegistration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterRegistration")
            .field("mime", &self.mime)
            .field("adapter", &self.adapter.name())
            .field("priority", &self.priority)
            .field("seq", &self.seq)
            .finish()
    }
}

/// Result of a paste lookup.
#[derive(Debug, Clone)]
pub struct DecodedSlice {
    pub slice: SliceSnapshot,
    /// Concrete type of the payload item that was decoded.
    pub mime: MimeType,
    pub adapter: String,
}

#[derive(Default)]
struct RegistryInner {
    /// Keyed by MIME essence: at most one registration per type.
    entries: BTreeMap<String, AdapterRegistration>,
    next_seq: u64,
}

#[derive(Default)]
pub struct AdapterRegistry {
    inner: RwLock<RegistryInner>,
}

impl AdapterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the adapter for `mime`.
    ///
    /// The returned handle removes this registration only; if the type has
    /// been re-registered since, disposing a stale handle leaves the newer
    /// registration in place.
    pub fn register_adapter(
        self: &Arc<Self>,
        mime: MimeType,
        adapter: Arc<dyn ClipboardAdapterPort>,
        priority: i32,
    ) -> Disposable {
        let key = mime.essence();
        let seq = {
            let mut inner = self.write();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            debug!(mime = %mime, adapter = adapter.name(), priority, "Registering clipboard adapter");
            inner.entries.insert(
                key.clone(),
                AdapterRegistration {
                    mime,
                    adapter,
                    priority,
                    seq,
                },
            );
            seq
        };

        let registry: Weak<Self> = Arc::downgrade(self);
        Disposable::new(move || {
            if let Some(registry) = registry.upgrade() {
                registry.release(&key, seq);
            }
        })
    }

    /// Remove the adapter for `mime`; no-op if absent.
    pub fn unregister_adapter(&self, mime: &MimeType) {
        if self.write().entries.remove(&mime.essence()).is_some() {
            debug!(mime = %mime, "Unregistered clipboard adapter");
        }
    }

    fn release(&self, key: &str, seq: u64) {
        let mut inner = self.write();
        if inner.entries.get(key).is_some_and(|entry| entry.seq == seq) {
            inner.entries.remove(key);
        }
    }

    pub fn contains(&self, mime: &MimeType) -> bool {
        self.read().entries.contains_key(&mime.essence())
    }

    pub fn len(&self) -> usize {
        self.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All registrations in lookup order.
    pub fn registrations(&self) -> Vec<AdapterRegistration> {
        let mut regs: Vec<AdapterRegistration> = self.read().entries.values().cloned().collect();
        regs.sort_by(Self::lookup_order);
        regs
    }

    fn lookup_order(a: &AdapterRegistration, b: &AdapterRegistration) -> Ordering {
        // 1) priority: desc
        match b.priority.cmp(&a.priority) {
            Ordering::Equal => {}
            ord => return ord,
        }
        // 2) most recent registration first
        b.seq.cmp(&a.seq)
    }

    /// Materialize `slice` into every representation a registered adapter can
    /// produce, highest priority first.
    ///
    /// Wildcard registrations are skipped: a clipboard item needs a concrete
    /// type. An adapter that fails to encode is logged and skipped so the other
    /// representations still reach the clipboard.
    pub async fn encode_all(&self, slice: &SliceSnapshot) -> Result<ClipboardPayload, ClipboardError> {
        let regs = self.registrations();
        let mut payload = ClipboardPayload::default();
        let mut tried = Vec::new();

        for reg in regs.iter().filter(|reg| !reg.mime.is_wildcard()) {
            tried.push(reg.mime.clone());
            match reg.adapter.encode(slice, &reg.mime).await {
                Ok(Some(data)) => {
                    debug!(mime = %reg.mime, adapter = reg.adapter.name(), size = data.len(), "Encoded representation");
                    payload.push(
                        ClipboardItem::new(reg.mime.clone(), data)
                            .with_meta(meta_keys::PRODUCED_BY, reg.adapter.name()),
                    );
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(mime = %reg.mime, adapter = reg.adapter.name(), error = %err, "Adapter failed to encode, skipping");
                }
            }
        }

        if payload.is_empty() {
            return Err(ClipboardError::AdapterNotFound { mimes: tried });
        }
        Ok(payload)
    }

    /// Decode `payload` with the highest-priority adapter that accepts it.
    ///
    /// Candidates are registrations whose type matches an item present in the
    /// payload. They are tried in lookup order; an adapter that declines
    /// passes to the next one, which is how the low-priority plain-text and
    /// catch-all adapters act as fallbacks. An adapter error stops the lookup.
    pub async fn decode_first(
        &self,
        payload: &ClipboardPayload,
        ctx: &AdapterContext,
    ) -> Result<DecodedSlice, ClipboardError> {
        for reg in self.registrations() {
            for item in payload.items.iter().filter(|item| reg.mime.matches(&item.mime)) {
                let decoded = reg
                    .adapter
                    .decode(item, ctx)
                    .await
                    .map_err(|err| ClipboardError::DeserializationFailure {
                        mime: item.mime.clone(),
                        reason: format!("{err:#}"),
                    })?;

                match decoded {
                    Some(slice) => {
                        debug!(mime = %item.mime, adapter = reg.adapter.name(), blocks = slice.block_count(), "Decoded clipboard payload");
                        return Ok(DecodedSlice {
                            slice,
                            mime: item.mime.clone(),
                            adapter: reg.adapter.name().to_string(),
                        });
                    }
                    None => {
                        debug!(mime = %item.mime, adapter = reg.adapter.name(), "Adapter declined, trying next");
                    }
                }
            }
        }

        Err(ClipboardError::AdapterNotFound {
            mimes: payload.mime_types(),
        })
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, RegistryInner> {
        self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, RegistryInner> {
        self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
