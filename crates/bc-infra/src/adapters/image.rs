//! Image adapter (paste only).
//!
//! Stores the pasted bytes in the blob store and yields one `affine:image`
//! block pointing at the blob.

use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use bc_core::block::flavour::{self, props};
use bc_core::ports::{AdapterContext, BlobStorePort, ClipboardAdapterPort};
use bc_core::{BlockId, BlockSnapshot, ClipboardData, ClipboardItem, MimeType, SliceSnapshot};

pub struct ImageAdapter {
    blobs: Arc<dyn BlobStorePort>,
}

impl ImageAdapter {
    pub fn new(blobs: Arc<dyn BlobStorePort>) -> Self {
        Self { blobs }
    }
}

#[async_trait]
impl ClipboardAdapterPort for ImageAdapter {
    fn name(&self) -> &str {
        "image"
    }

    async fn encode(&self, _slice: &SliceSnapshot, _mime: &MimeType) -> Result<Option<ClipboardData>> {
        Ok(None)
    }

    async fn decode(&self, item: &ClipboardItem, ctx: &AdapterContext) -> Result<Option<SliceSnapshot>> {
        if !item.mime.is_image() || item.data.is_empty() {
            return Ok(None);
        }
        let size = item.data.len();
        let source_id = self
            .blobs
            .put(item.data.as_bytes().to_vec())
            .await
            .context("failed to store pasted image")?;
        debug!(source_id = %source_id, mime = %item.mime, size, "Pasted image stored");

        let block = BlockSnapshot::new(BlockId::new(), flavour::IMAGE)
            .with_prop(props::SOURCE_ID, source_id.as_str())
            .with_prop(props::SIZE, size);
        Ok(Some(SliceSnapshot::new(
            vec![block],
            ctx.doc_id.clone(),
            ctx.workspace_id.clone(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use bc_core::{DocId, WorkspaceId};

    fn ctx() -> AdapterContext {
        AdapterContext {
            doc_id: DocId::from("doc"),
            workspace_id: WorkspaceId::from("ws"),
        }
    }

    #[tokio::test]
    async fn test_decode_stores_blob() {
        let blobs = Arc::new(MemoryBlobStore::new());
        let adapter = ImageAdapter::new(blobs.clone());
        let item = ClipboardItem::new(MimeType::from("image/png"), ClipboardData::bytes(vec![0x89, 0x50, 0x4e, 0x47]));

        let slice = adapter.decode(&item, &ctx()).await.unwrap().unwrap();
        let block = &slice.content[0];
        assert_eq!(block.flavour, flavour::IMAGE);
        let expected = MemoryBlobStore::blob_id_for(&[0x89, 0x50, 0x4e, 0x47]);
        assert_eq!(block.prop_str(props::SOURCE_ID), Some(expected.as_str()));
        assert!(blobs.get(&expected).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_encode_is_not_supported() {
        let adapter = ImageAdapter::new(Arc::new(MemoryBlobStore::new()));
        let slice = SliceSnapshot::new(vec![], DocId::from("doc"), WorkspaceId::from("ws"));
        assert!(adapter.encode(&slice, &MimeType::from("image/png")).await.unwrap().is_none());
    }
}
