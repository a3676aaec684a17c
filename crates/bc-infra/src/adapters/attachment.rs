//! Catch-all attachment adapter (paste only).
//!
//! Any binary item no other adapter took becomes an `affine:attachment`
//! block. Text items are declined.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use bc_core::block::flavour::{self, props};
use bc_core::clipboard::meta_keys;
use bc_core::ports::{AdapterContext, BlobStorePort, ClipboardAdapterPort};
use bc_core::{BlockId, BlockSnapshot, ClipboardData, ClipboardItem, MimeType, SliceSnapshot};

const UNTITLED: &str = "untitled";

pub struct AttachmentAdapter {
    blobs: Arc<dyn BlobStorePort>,
}

impl AttachmentAdapter {
    pub fn new(blobs: Arc<dyn BlobStorePort>) -> Self {
        Self { blobs }
    }
}

#[async_trait]
impl ClipboardAdapterPort for AttachmentAdapter {
    fn name(&self) -> &str {
        "attachment"
    }

    async fn encode(&self, _slice: &SliceSnapshot, _mime: &MimeType) -> Result<Option<ClipboardData>> {
        Ok(None)
    }

    async fn decode(&self, item: &ClipboardItem, ctx: &AdapterContext) -> Result<Option<SliceSnapshot>> {
        let ClipboardData::Bytes { bytes } = &item.data else {
            return Ok(None);
        };
        if bytes.is_empty() {
            return Ok(None);
        }

        let source_id = self
            .blobs
            .put(bytes.clone())
            .await
            .context("failed to store pasted attachment")?;
        let name = item
            .meta
            .get(meta_keys::FILE_NAME)
            .map(String::as_str)
            .unwrap_or(UNTITLED);
        debug!(source_id = %source_id, mime = %item.mime, name, "Pasted attachment stored");

        let block = BlockSnapshot::new(BlockId::new(), flavour::ATTACHMENT)
            .with_prop(props::NAME, name)
            .with_prop(props::SIZE, bytes.len())
            .with_prop(props::TYPE, item.mime.essence())
            .with_prop(props::SOURCE_ID, source_id.as_str());
        Ok(Some(SliceSnapshot::new(
            vec![block],
            ctx.doc_id.clone(),
            ctx.workspace_id.clone(),
        )))
    }
}
