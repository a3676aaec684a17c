//! System clipboard port - abstracts platform clipboard access

use anyhow::Result;
use async_trait::async_trait;

use crate::clipboard::ClipboardPayload;

#[async_trait]
pub trait SystemClipboardPort: Send + Sync {
    /// Whether the platform exposes a usable clipboard. The clipboard
    /// pipeline does not attach at all when this is `false`.
    fn is_available(&self) -> bool;

    /// Read every representation currently on the clipboard.
    async fn read(&self) -> Result<ClipboardPayload>;

    /// Replace the clipboard content with `payload`.
    async fn write(&self, payload: ClipboardPayload) -> Result<()>;
}
