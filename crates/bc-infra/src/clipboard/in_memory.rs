//! In-process system clipboard.
//!
//! Holds the last written payload. An unavailable clipboard (no clipboard
//! API on the platform) fails every read and write.

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use bc_core::ports::SystemClipboardPort;
use bc_core::ClipboardPayload;

#[derive(Debug)]
pub struct InMemorySystemClipboard {
    available: bool,
    payload: RwLock<ClipboardPayload>,
}

impl Default for InMemorySystemClipboard {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemorySystemClipboard {
    pub fn new() -> Self {
        Self {
            available: true,
            payload: RwLock::new(ClipboardPayload::default()),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn with_payload(payload: ClipboardPayload) -> Self {
        Self {
            available: true,
            payload: RwLock::new(payload),
        }
    }

    /// Current content, for inspection.
    pub async fn contents(&self) -> ClipboardPayload {
        self.payload.read().await.clone()
    }
}

#[async_trait]
impl SystemClipboardPort for InMemorySystemClipboard {
    fn is_available(&self) -> bool {
        self.available
    }

    async fn read(&self) -> Result<ClipboardPayload> {
        if !self.available {
            bail!("system clipboard is not available");
        }
        Ok(self.payload.read().await.clone())
    }

    async fn write(&self, payload: ClipboardPayload) -> Result<()> {
        if !self.available {
            bail!("system clipboard is not available");
        }
        debug!(types = ?payload.mime_types(), "Writing clipboard payload");
        *self.payload.write().await = payload;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bc_core::{ClipboardData, ClipboardItem, MimeType};

    #[tokio::test]
    async fn test_write_then_read() {
        let clipboard = InMemorySystemClipboard::new();
        let payload = ClipboardPayload::new(vec![ClipboardItem::new(
            MimeType::text_plain(),
            ClipboardData::text("hello"),
        )]);
        clipboard.write(payload.clone()).await.unwrap();
        assert_eq!(clipboard.read().await.unwrap(), payload);
    }

    #[tokio::test]
    async fn test_unavailable_clipboard_fails() {
        let clipboard = InMemorySystemClipboard::unavailable();
        assert!(!clipboard.is_available());
        assert!(clipboard.read().await.is_err());
        assert!(clipboard.write(ClipboardPayload::default()).await.is_err());
    }
}
