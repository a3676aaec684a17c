//! Content-addressed in-memory blob store.
//!
//! Blobs are keyed by the hex encoded blake3 hash of their bytes, so storing
//! the same image twice yields the same source id.

use std::collections::HashMap;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use bc_core::ports::BlobStorePort;
use bc_core::BlobId;

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    blobs: RwLock<HashMap<BlobId, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blob_id_for(bytes: &[u8]) -> BlobId {
        BlobId::from(hex::encode(blake3::hash(bytes).as_bytes()))
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl BlobStorePort for MemoryBlobStore {
    async fn put(&self, bytes: Vec<u8>) -> Result<BlobId> {
        let id = Self::blob_id_for(&bytes);
        let size = bytes.len();
        let mut blobs = self.blobs.write().await;
        if blobs.insert(id.clone(), bytes).is_none() {
            debug!(blob_id = %id, size, "Stored blob");
        }
        Ok(id)
    }

    async fn get(&self, id: &BlobId) -> Result<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_is_content_addressed() {
        let store = MemoryBlobStore::new();
        let a = store.put(b"png bytes".to_vec()).await.unwrap();
        let b = store.put(b"png bytes".to_vec()).await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.as_str().len(), 64);
        assert_eq!(store.len().await, 1);
        assert_eq!(store.get(&a).await.unwrap().as_deref(), Some(&b"png bytes"[..]));
    }

    #[tokio::test]
    async fn test_get_unknown_returns_none() {
        let store = MemoryBlobStore::new();
        assert!(store.get(&BlobId::from("missing")).await.unwrap().is_none());
    }
}
