//! Format Adapter Port
//!
//! An adapter converts between one clipboard representation (identified by
//! MIME type) and the editor's [`SliceSnapshot`].
//!
//! **Semantic:** `encode` = slice -> representation (copy),
//! `decode` = representation -> slice (paste).

use async_trait::async_trait;

use crate::block::SliceSnapshot;
use crate::clipboard::{ClipboardData, ClipboardItem, MimeType};
use crate::ids::{DocId, WorkspaceId};

/// Destination a decoded slice is meant for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdapterContext {
    pub doc_id: DocId,
    pub workspace_id: WorkspaceId,
}

#[async_trait]
pub trait ClipboardAdapterPort: Send + Sync {
    /// Human-readable adapter name, used in logs.
    fn name(&self) -> &str;

    /// Encode `slice` as `mime`.
    ///
    /// # Returns
    /// - `Ok(Some(data))` when the adapter can represent the slice
    /// - `Ok(None)` when it cannot (the type is skipped, not an error)
    async fn encode(
        &self,
        slice: &SliceSnapshot,
        mime: &MimeType,
    ) -> anyhow::Result<Option<ClipboardData>>;

    /// Decode a clipboard item into a slice.
    ///
    /// # Returns
    /// - `Ok(Some(slice))` on success
    /// - `Ok(None)` when the adapter declines the data (next candidate is tried)
    /// - `Err(_)` when the data is malformed
    async fn decode(
        &self,
        item: &ClipboardItem,
        ctx: &AdapterContext,
    ) -> anyhow::Result<Option<SliceSnapshot>>;
}
